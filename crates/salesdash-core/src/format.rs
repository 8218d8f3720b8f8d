/// Renders a figure compactly for headline metrics: `"R$ 12.50"`,
/// `"R$ 3.40 mil"`, `"1.20 milhões"`. An empty `prefix` is omitted.
#[must_use]
pub fn format_number(value: f64, prefix: &str) -> String {
    let mut value = value;
    for unit in ["", "mil"] {
        if value < 1000.0 {
            return join(prefix, &format!("{value:.2}"), unit);
        }
        value /= 1000.0;
    }
    join(prefix, &format!("{value:.2}"), "milhões")
}

fn join(prefix: &str, number: &str, unit: &str) -> String {
    [prefix, number, unit]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
