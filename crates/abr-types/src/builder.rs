//! Setter generators shared by the tier builders.
//!
//! Every builder carries a `key: String` used in diagnostics. A generated
//! setter validates its value against the named row of [`crate::fields`]
//! before storing it, so a builder never holds an invalid value.

/// Free-text setters: `name => RULE`.
macro_rules! text_setters {
    ($($name:ident => $rule:ident),* $(,)?) => {
        $(
            #[doc = concat!("Validates and sets `", stringify!($name), "`.")]
            pub fn $name(mut self, value: Option<&str>) -> $crate::error::MasterResult<Self> {
                $crate::fields::$rule.validate(value, &self.key)?;
                self.$name = value.map(str::to_owned);
                Ok(self)
            }
        )*
    };
}

/// Coded setters: `name => RULE as Enum`. The text grammar runs first, then
/// the code lookup.
macro_rules! code_setters {
    ($($name:ident => $rule:ident as $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Validates and sets `", stringify!($name), "` from its code.")]
            pub fn $name(mut self, value: Option<&str>) -> $crate::error::MasterResult<Self> {
                let rule = &$crate::fields::$rule;
                rule.validate(value, &self.key)?;
                self.$name = value
                    .map(|code| <$ty as $crate::enums::CodeSet>::parse(code, rule.name, &self.key))
                    .transpose()?;
                Ok(self)
            }
        )*
    };
}

/// Optional date setters. Dates carry no grammar beyond their type.
macro_rules! date_setters {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Sets `", stringify!($name), "`.")]
            pub fn $name(mut self, value: Option<chrono::NaiveDate>) -> Self {
                self.$name = value;
                self
            }
        )*
    };
}

/// Validates a mandatory text value and returns it owned.
pub(crate) fn required(
    rule: &crate::grammar::FieldRule,
    value: Option<&str>,
    key: &str,
) -> crate::error::MasterResult<String> {
    rule.validate(value, key)?;
    Ok(value.unwrap_or_default().to_owned())
}
