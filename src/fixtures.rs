//! Records shared by the unit tests

use crate::field::Primitive;
use crate::record::{Record, RecordDescriptor};

pub fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sample {
    pub foo: String,
    pub bar: i32,
    pub baz: String,
    pub frop: f32,
}

impl Record for Sample {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("Foo", |s| &s.foo, |s| &mut s.foo).column("foo");
        d.field("Bar", |s| &s.bar, |s| &mut s.bar).column("BAR");
        d.field("Baz", |s| &s.baz, |s| &mut s.baz).column("Baz");
        d.field("Frop", |s| &s.frop, |s| &mut s.frop).column("Quux");
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EmbedSample {
    pub qux: String,
    pub sample: Sample,
    pub ignore: String,
    pub grault: f64,
    pub quux: String,
}

impl Record for EmbedSample {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("Qux", |s| &s.qux, |s| &mut s.qux).column("first");
        d.record("Sample", |s| &s.sample, |s| &mut s.sample).embedded();
        d.field("Ignore", |s| &s.ignore, |s| &mut s.ignore).column("ignore").ignore();
        d.field("Grault", |s| &s.grault, |s| &mut s.grault).column("garply");
        d.field("Quux", |s| &s.quux, |s| &mut s.quux).column("last");
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SkipFieldSample {
    pub embed: EmbedSample,
    pub more_ignore: String,
    pub corge: String,
}

impl Record for SkipFieldSample {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.record("EmbedSample", |s| &s.embed, |s| &mut s.embed).embedded();
        d.field("MoreIgnore", |s| &s.more_ignore, |s| &mut s.more_ignore).ignore();
        d.field("Corge", |s| &s.corge, |s| &mut s.corge).column("abc");
    }
}

/// Fields that never reach the CSV surface
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Unmapped {
    pub unannotated: i64,
    pub ignored: String,
    pub kept: bool,
    pub inner: Sample,
    pub ignored_embed: Sample,
}

impl Record for Unmapped {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("Unannotated", |s| &s.unannotated, |s| &mut s.unannotated);
        d.field("Ignored", |s| &s.ignored, |s| &mut s.ignored).ignore();
        d.field("Kept", |s| &s.kept, |s| &mut s.kept).column("kept");
        d.record("Inner", |s| &s.inner, |s| &mut s.inner);
        d.record("IgnoredEmbed", |s| &s.ignored_embed, |s| &mut s.ignored_embed)
            .embedded()
            .ignore();
    }
}

/// A sub-record mapped to a single column without being embedded
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Nested {
    pub id: u32,
    pub inner: Sample,
}

impl Record for Nested {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("Id", |s| &s.id, |s| &mut s.id).column("id");
        d.record("Inner", |s| &s.inner, |s| &mut s.inner).column("inner");
    }
}

/// Two fields sharing a column name
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Duplicated {
    pub first: u8,
    pub y: u8,
    pub second: u8,
}

impl Record for Duplicated {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("First", |s| &s.first, |s| &mut s.first).column("x");
        d.field("Y", |s| &s.y, |s| &mut s.y).column("y");
        d.field("Second", |s| &s.second, |s| &mut s.second).column("x");
    }
}

/// Text that refuses to be written with uppercase letters
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Lowercase(pub String);

impl Primitive for Lowercase {
    fn type_name(&self) -> &'static str {
        "Lowercase"
    }

    fn parse_text(&mut self, text: &str) -> Result<(), String> {
        self.0 = text.to_string();
        Ok(())
    }

    fn format_text(&self) -> Result<String, String> {
        if self.0.chars().any(char::is_uppercase) {
            return Err(format!("'{}' is not lowercase", self.0));
        }
        Ok(self.0.clone())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Strict {
    pub code: Lowercase,
}

impl Record for Strict {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.field("code", |s| &s.code, |s| &mut s.code).column("code");
    }
}
