//! Method names and the with/without-delay aliases.
//!
//! `tell!` を非同期化すると 3 つの名前が有効になる:
//! - `tell!` / `tell_with_delay!`: enqueue する wrapper
//! - `tell_without_delay!`: 元の本体（同期実行）
//!
//! 末尾の `!` `?` `=` は suffix の後ろに残す。

const WITH_DELAY: &str = "_with_delay";
const WITHOUT_DELAY: &str = "_without_delay";

/// Which entry point a method name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Plain,
    WithDelay,
    WithoutDelay,
}

/// A method name split into its base name and variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodAlias {
    base: String,
    variant: Variant,
}

impl MethodAlias {
    pub fn parse(name: &str) -> Self {
        let (stem, punctuation) = split_punctuation(name);
        for (suffix, variant) in [
            (WITHOUT_DELAY, Variant::WithoutDelay),
            (WITH_DELAY, Variant::WithDelay),
        ] {
            if let Some(base) = stem.strip_suffix(suffix)
                && !base.is_empty()
            {
                return Self {
                    base: format!("{base}{punctuation}"),
                    variant,
                };
            }
        }
        Self {
            base: name.to_string(),
            variant: Variant::Plain,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }
}

/// `tell!` -> `tell_without_delay!`
pub fn without_delay(name: &str) -> String {
    with_suffix(name, WITHOUT_DELAY)
}

/// `tell!` -> `tell_with_delay!`
pub fn with_delay(name: &str) -> String {
    with_suffix(name, WITH_DELAY)
}

fn with_suffix(name: &str, suffix: &str) -> String {
    let (stem, punctuation) = split_punctuation(name);
    format!("{stem}{suffix}{punctuation}")
}

fn split_punctuation(name: &str) -> (&str, &str) {
    match name.char_indices().last() {
        Some((i, '?' | '!' | '=')) => name.split_at(i),
        _ => (name, ""),
    }
}
