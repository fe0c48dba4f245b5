#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MathConstant {
    pub name: &'static str,
    pub value: f64,
}

pub static CONSTANTS: &[MathConstant] = &[
    MathConstant {
        name: "pi",
        value: std::f64::consts::PI,
    },
    MathConstant {
        name: "π",
        value: std::f64::consts::PI,
    },
    MathConstant {
        name: "e",
        value: std::f64::consts::E,
    },
];

pub fn find_constant(name: &str) -> Option<&'static MathConstant> {
    CONSTANTS.iter().find(|constant| constant.name == name)
}
