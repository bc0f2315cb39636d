use serde::Serialize;

/// Members counted by gender. Unknown non-empty values count as `other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderBreakdown {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

impl GenderBreakdown {
    pub fn total(&self) -> usize {
        self.male + self.female + self.other
    }
}

/// Case-insensitive tally; `None` and blank values are dropped.
pub fn gender_breakdown<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> GenderBreakdown {
    values
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .fold(GenderBreakdown::default(), |mut acc, g| {
            match g.to_lowercase().as_str() {
                "male" => acc.male += 1,
                "female" => acc.female += 1,
                _ => acc.other += 1,
            }
            acc
        })
}
