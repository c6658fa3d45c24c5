// Finnish display formatting for counts, shares and result sentences

use crate::index::percentage_foreign;
use crate::parser::AreaRecord;

/// fi-FI digit grouping separator
const GROUP_SEPARATOR: char = '\u{a0}';

/// 1234567 → "1 234 567" (non-breaking spaces)
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// "18.5%"; an undefined share is shown as "0.0%"
pub fn format_percentage(share: Option<f64>) -> String {
    match share {
        Some(p) => format!("{:.1}%", p),
        None => "0.0%".to_string(),
    }
}

pub fn area_sentence(record: &AreaRecord) -> String {
    format!(
        "Varhaiskasvatukseen osallistui yhteensä {} lasta, joista {} oli vieraskielisiä ({}).",
        format_count(record.total()),
        format_count(record.foreign()),
        format_percentage(percentage_foreign(record)),
    )
}

pub fn national_sentence(record: &AreaRecord) -> String {
    format!(
        "Koko maassa varhaiskasvatukseen osallistui {} lasta, joista {} oli vieraskielisiä ({}).",
        format_count(record.total()),
        format_count(record.foreign()),
        format_percentage(percentage_foreign(record)),
    )
}

/// Shown after an explicit search that found nothing; quotes the raw input
pub fn not_found_message(query: &str) -> String {
    format!("Kuntaa \"{}\" ei löytynyt (tarkista kirjoitusasu).", query)
}
