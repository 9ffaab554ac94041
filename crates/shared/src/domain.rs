use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

macro_rules! image_classes {
    ($($variant:ident => $label:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum ImageClass {
            $($variant),+
        }

        impl ImageClass {
            /// Output classes in the order the model emits their indices.
            pub const ALL: [ImageClass; 10] = [$(ImageClass::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $(ImageClass::$variant => $label),+
                }
            }
        }
    };
}

image_classes! {
    Airplane => "Airplane",
    Automobile => "Automobile",
    Bird => "Bird",
    Cat => "Cat",
    Deer => "Deer",
    Dog => "Dog",
    Frog => "Frog",
    Horse => "Horse",
    Ship => "Ship",
    Truck => "Truck",
}

impl ImageClass {
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ImageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text shown in the result region of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClassificationResult {
    #[default]
    Empty,
    Success {
        label: String,
    },
    Error {
        message: String,
    },
}

impl ClassificationResult {
    pub fn success(class: ImageClass) -> Self {
        Self::Success {
            label: class.label().to_string(),
        }
    }

    pub fn failure(error: &ClassifyError) -> Self {
        Self::Error {
            message: error.user_message().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn display_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Success { label } => Some(format!("Classified as: {label}")),
            Self::Error { message } => Some(message.clone()),
        }
    }
}
