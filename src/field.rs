//! Conversion between a single CSV cell and an elementary field value

/// An elementary value that maps to exactly one CSV cell
///
/// The trait is object safe so records can hand out `&dyn Primitive` views of
/// their fields. `parse_text` must invert `format_text` for every value that
/// formats successfully.
///
/// Implement it for your own types to use them as leaf fields.
pub trait Primitive {
    /// Name of the type, used in error messages
    fn type_name(&self) -> &'static str;

    /// Replace the current value with the one parsed from `text`
    ///
    /// # Arguments
    /// - `text` - The raw CSV cell, quoting already resolved
    ///
    /// # Returns
    /// Ok(()) if the value was parsed, or a human readable reason otherwise
    fn parse_text(&mut self, text: &str) -> Result<(), String>;

    /// Render the current value as a CSV cell
    fn format_text(&self) -> Result<String, String>;
}

impl Primitive for String {
    fn type_name(&self) -> &'static str {
        "String"
    }

    fn parse_text(&mut self, text: &str) -> Result<(), String> {
        self.clear();
        self.push_str(text);
        Ok(())
    }

    fn format_text(&self) -> Result<String, String> {
        Ok(self.clone())
    }
}

impl Primitive for bool {
    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn parse_text(&mut self, text: &str) -> Result<(), String> {
        *self = match text {
            "" => false,
            "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
            "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
            _ => return Err("invalid boolean".to_string()),
        };
        Ok(())
    }

    fn format_text(&self) -> Result<String, String> {
        Ok(self.to_string())
    }
}

impl Primitive for char {
    fn type_name(&self) -> &'static str {
        "char"
    }

    fn parse_text(&mut self, text: &str) -> Result<(), String> {
        let mut chars = text.chars();
        *self = match (chars.next(), chars.next()) {
            (None, _) => char::default(),
            (Some(c), None) => c,
            _ => return Err("expected a single character".to_string()),
        };
        Ok(())
    }

    fn format_text(&self) -> Result<String, String> {
        if *self == char::default() {
            return Ok(String::new());
        }
        Ok(self.to_string())
    }
}

/// Numbers parse through `FromStr` and format through `Display`
///
/// Rust's float `Display` prints the shortest digits that round-trip and never
/// switches to scientific notation, so `format_text` then `parse_text` is lossless.
macro_rules! impl_numeric_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Primitive for $ty {
                fn type_name(&self) -> &'static str {
                    stringify!($ty)
                }

                fn parse_text(&mut self, text: &str) -> Result<(), String> {
                    if text.is_empty() {
                        *self = <$ty>::default();
                        return Ok(());
                    }
                    *self = text.parse::<$ty>().map_err(|e| e.to_string())?;
                    Ok(())
                }

                fn format_text(&self) -> Result<String, String> {
                    Ok(self.to_string())
                }
            }
        )*
    };
}

impl_numeric_primitive!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Optional cells: an empty cell is `None`
///
/// A `Some` whose inner text is empty (e.g. `Some(String::new())`) would read
/// back as `None`, so formatting it is an error.
impl<P: Primitive + Default> Primitive for Option<P> {
    fn type_name(&self) -> &'static str {
        match self {
            Some(v) => v.type_name(),
            None => P::default().type_name(),
        }
    }

    fn parse_text(&mut self, text: &str) -> Result<(), String> {
        if text.is_empty() {
            *self = None;
            return Ok(());
        }
        let mut value = P::default();
        value.parse_text(text)?;
        *self = Some(value);
        Ok(())
    }

    fn format_text(&self) -> Result<String, String> {
        match self {
            Some(v) => {
                let text = v.format_text()?;
                if text.is_empty() {
                    return Err(format!("empty {} cannot be told apart from None", v.type_name()));
                }
                Ok(text)
            }
            None => Ok(String::new()),
        }
    }
}
