/// Whole-unit currency: `$1,250` / `-$50`.
pub fn format_pnl(value: f64) -> String {
    if value >= 0.0 {
        format!("${}", group_thousands(value))
    } else {
        format!("-${}", group_thousands(value.abs()))
    }
}

/// Like [`format_pnl`] but non-negative values carry a `+`.
pub fn format_pnl_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+${}", group_thousands(value))
    } else {
        format!("-${}", group_thousands(value.abs()))
    }
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
