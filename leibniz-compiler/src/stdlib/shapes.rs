use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ShapeClass {
    Triangle,
    Rectangle,
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ShapeMethod {
    Area,
    Perimeter,
    Circumference,
}

impl ShapeMethod {
    pub fn name(self) -> &'static str {
        match self {
            ShapeMethod::Area => "area",
            ShapeMethod::Perimeter => "perimeter",
            ShapeMethod::Circumference => "circumference",
        }
    }
}

/// Constructor and method table of one built-in class.
#[derive(Clone, Copy, Debug)]
pub struct ClassDefinition {
    pub class: ShapeClass,
    pub fields: &'static [&'static str],
    pub methods: &'static [ShapeMethod],
}

pub static CLASSES: &[ClassDefinition] = &[
    ClassDefinition {
        class: ShapeClass::Circle,
        fields: &["radius"],
        methods: &[ShapeMethod::Area, ShapeMethod::Circumference],
    },
    ClassDefinition {
        class: ShapeClass::Rectangle,
        fields: &["base", "height"],
        methods: &[ShapeMethod::Area, ShapeMethod::Perimeter],
    },
    ClassDefinition {
        class: ShapeClass::Triangle,
        fields: &["side1", "side2", "side3"],
        methods: &[ShapeMethod::Area, ShapeMethod::Perimeter],
    },
];

impl ShapeClass {
    pub fn name(self) -> &'static str {
        match self {
            ShapeClass::Triangle => "Triangle",
            ShapeClass::Rectangle => "Rectangle",
            ShapeClass::Circle => "Circle",
        }
    }

    pub fn definition(self) -> &'static ClassDefinition {
        match self {
            ShapeClass::Circle => &CLASSES[0],
            ShapeClass::Rectangle => &CLASSES[1],
            ShapeClass::Triangle => &CLASSES[2],
        }
    }

    pub fn method(self, name: &str) -> Option<ShapeMethod> {
        self.definition()
            .methods
            .iter()
            .copied()
            .find(|method| method.name() == name)
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn find_class(name: &str) -> Option<ShapeClass> {
    CLASSES
        .iter()
        .map(|definition| definition.class)
        .find(|class| class.name() == name)
}
