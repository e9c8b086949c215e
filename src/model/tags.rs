use serde::{Deserialize, Serialize};
use std::fmt;

/// Master macro for the string tags carried in catalog JSON (`"type": "VIEW"`, ...).
///
/// Each tag becomes a closed enum with one extra `Other(String)` case, so unknown tags
/// coming from the catalog round-trip verbatim instead of failing deserialization.
macro_rules! string_tag {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// A tag this crate has no special handling for, preserved as-is.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $tag, )*
                    Self::Other(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $( $tag => Self::$variant, )*
                    _ => Self::Other(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(tag: $name) -> String {
                match tag {
                    $( $name::$variant => $tag.to_string(), )*
                    $name::Other(raw) => raw,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_tag! {
    /// The kind of a step on the canvas.
    StepType {
        View => "VIEW",
        Execution => "EXECUTION",
        /// Synthetic entry node.
        Start => "START",
        /// Synthetic terminal node.
        End => "END",
    }
}

string_tag! {
    /// The kind of a UI element inside a step.
    ElementType {
        Button => "BUTTON",
        Form => "FORM",
        Input => "INPUT",
        Typography => "TYPOGRAPHY",
        Image => "IMAGE",
        Divider => "DIVIDER",
        Captcha => "CAPTCHA",
        RichText => "RICH_TEXT",
    }
}

string_tag! {
    /// Element variants. Buttons and inputs share the same vocabulary.
    Variant {
        Primary => "PRIMARY",
        Secondary => "SECONDARY",
        Text => "TEXT",
        Password => "PASSWORD",
        Email => "EMAIL",
        Otp => "OTP",
        Checkbox => "CHECKBOX",
        Telephone => "TELEPHONE",
        Number => "NUMBER",
    }
}

string_tag! {
    /// Catalog template kinds.
    TemplateType {
        Blank => "BLANK",
        Basic => "BASIC",
        BasicFederated => "BASIC_FEDERATED",
        GenerateWithAi => "GENERATE_WITH_AI",
    }
}

string_tag! {
    /// Transition descriptor kind on an action.
    ActionType {
        Executor => "EXECUTOR",
        Next => "NEXT",
    }
}

string_tag! {
    /// How a widget step is combined with the graph it is dropped onto.
    MergeStrategy {
        MergeWithDropPoint => "MERGE_WITH_DROP_POINT",
    }
}

string_tag! {
    /// How a replacer resolves its placeholder.
    ReplacerStrategy {
        /// Generate a fresh unique identifier.
        Id => "ID",
    }
}

impl StepType {
    /// Start and End are the synthetic boundary nodes.
    pub fn is_boundary(&self) -> bool {
        matches!(self, StepType::Start | StepType::End)
    }
}
