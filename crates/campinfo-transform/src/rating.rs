//! Rating code extraction.
//!
//! Rating columns reference bar images such as `Bilder/balken_43.ai`; the two
//! digits in the file name are the score and are rendered as `4,3`.

use campinfo_model::RatingCodeRule;

use crate::error::RatingIssue;

/// Extract the rating code from an image reference and format it as `D,D`.
pub fn format_rating(rule: &RatingCodeRule, value: &str) -> Result<String, RatingIssue> {
    let file_name = value.rsplit(['/', '\\']).next().unwrap_or(value);
    let start = match *rule {
        RatingCodeRule::LastUnderscore => {
            file_name
                .rfind('_')
                .ok_or(RatingIssue::MissingUnderscore)?
                + 1
        }
        RatingCodeRule::Offset { offset } => file_name
            .char_indices()
            .nth(offset)
            .map_or(file_name.len() + 1, |(index, _)| index),
    };
    let code = file_name
        .get(start..start + 2)
        .ok_or(RatingIssue::TooShort { start })?;
    let mut digits = code.chars();
    match (digits.next(), digits.next()) {
        (Some(whole), Some(fraction)) if whole.is_ascii_digit() && fraction.is_ascii_digit() => {
            Ok(format!("{whole},{fraction}"))
        }
        _ => Err(RatingIssue::NotDigits {
            found: code.to_string(),
        }),
    }
}
