/// Declares a string-backed identifier enum with a `Custom(String)` escape hatch.
///
/// Each variant maps to a wire id (used for serde and lookups) and a human label.
/// Unknown wire ids deserialize into `Custom`, so values read from requests or
/// produced by older catalogs never fail to parse.
#[macro_export]
macro_rules! define_id_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $wire_id:literal : $label:literal
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            Custom(String),
        }

        impl $enum_name {
            /// Wire identifier, e.g. `"node_js"`.
            pub fn as_str(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $wire_id,
                    )*
                    Self::Custom(id) => id.as_str(),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $label,
                    )*
                    Self::Custom(id) => id.as_str(),
                }
            }

            /// Parses a wire identifier; unknown ids become `Custom`.
            pub fn parse(id: &str) -> Self {
                match id {
                    $(
                        $wire_id => Self::$variant,
                    )*
                    other => Self::Custom(other.to_string()),
                }
            }

            /// Returns the known variant for a wire id, or `None`.
            pub fn from_id(id: &str) -> Option<Self> {
                match Self::parse(id) {
                    Self::Custom(_) => None,
                    known => Some(known),
                }
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self::parse(&s))
            }
        }
    };
}
