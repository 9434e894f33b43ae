use std::convert::Infallible;
use std::str::FromStr;

/// Quoted value supplied via a behaviour-driven test step.
#[derive(Clone, Debug)]
pub struct StepValue {
    raw: String,
}

impl FromStr for StepValue {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let raw = input
            .trim()
            .trim_matches(|candidate| matches!(candidate, '"' | '\''))
            .to_owned();

        Ok(Self { raw })
    }
}

impl StepValue {
    /// Consumes the step value, yielding the unquoted string.
    pub fn into_inner(self) -> String {
        self.raw
    }

    /// Comma-separated items of the value, trimmed.
    pub fn items(&self) -> Vec<String> {
        self.raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }
}
