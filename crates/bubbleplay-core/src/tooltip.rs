//! Hover tooltip state and number formatting.

use crate::dataset::CountryRecord;
use crate::id::BubbleId;

/// Group the integer digits of an already formatted number with commas.
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(dot) => rest.split_at(dot),
        None => (rest, ""),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{frac_part}")
}

/// Thousands-grouped with no decimals: `1234567.8` -> `"1,234,568"`.
pub fn format_grouped(value: f64) -> String {
    group_thousands(&format!("{value:.0}"))
}

/// Dollar amount, grouped, no decimals: `12345.4` -> `"$12,345"`.
pub fn format_dollars(value: f64) -> String {
    let grouped = format_grouped(value.abs());
    if value < 0.0 && grouped != "0" {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Fixed two decimals: `72.456` -> `"72.46"`.
pub fn format_fixed2(value: f64) -> String {
    format!("{value:.2}")
}

/// The five tooltip lines for a record.
pub fn tooltip_lines(record: &CountryRecord) -> Vec<String> {
    vec![
        format!("Country: {}", record.country),
        format!("Continent: {}", record.continent),
        format!("Income: {}", format_dollars(record.income)),
        format!("Life expectancy: {}", format_fixed2(record.life_exp)),
        format!("Population: {}", format_grouped(record.population as f64)),
    ]
}

/// Floating tooltip bound to at most one bubble.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    target: Option<BubbleId>,
    /// Pointer position in page coordinates.
    position: (f64, f64),
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered a bubble: show at the pointer.
    pub fn pointer_over(&mut self, bubble: BubbleId, page_x: f64, page_y: f64) {
        self.target = Some(bubble);
        self.position = (page_x, page_y);
    }

    /// Pointer moved over the current bubble: follow it.
    pub fn pointer_move(&mut self, page_x: f64, page_y: f64) {
        self.position = (page_x, page_y);
    }

    /// Pointer left the bubble: hide.
    pub fn pointer_out(&mut self) {
        self.target = None;
    }

    /// Hide if bound to one of `removed`.
    pub fn forget(&mut self, removed: &[BubbleId]) {
        if self.target.is_some_and(|t| removed.contains(&t)) {
            self.target = None;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<BubbleId> {
        self.target
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continent::Continent;
    use slotmap::SlotMap;

    #[test]
    fn grouping() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1_234_567.8), "1,234,568");
        assert_eq!(format_grouped(-1234.0), "-1,234");
    }

    #[test]
    fn dollars() {
        assert_eq!(format_dollars(12_345.4), "$12,345");
        assert_eq!(format_dollars(400.0), "$400");
        assert_eq!(format_dollars(-1500.0), "-$1,500");
    }

    #[test]
    fn two_decimals() {
        assert_eq!(format_fixed2(72.456), "72.46");
        assert_eq!(format_fixed2(30.0), "30.00");
    }

    #[test]
    fn lines_for_record() {
        let record = CountryRecord {
            country: "Norway".into(),
            continent: Continent::Europe,
            income: 1520.0,
            life_exp: 32.0,
            population: 868_570,
        };
        assert_eq!(
            tooltip_lines(&record),
            vec![
                "Country: Norway",
                "Continent: europe",
                "Income: $1,520",
                "Life expectancy: 32.00",
                "Population: 868,570",
            ]
        );
    }

    #[test]
    fn show_follow_hide() {
        let mut ids: SlotMap<BubbleId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());

        let mut tip = Tooltip::new();
        assert!(!tip.is_visible());
        tip.pointer_over(a, 10.0, 20.0);
        assert_eq!(tip.target(), Some(a));
        tip.pointer_move(15.0, 25.0);
        assert_eq!(tip.position(), (15.0, 25.0));
        tip.forget(&[b]);
        assert!(tip.is_visible());
        tip.forget(&[a]);
        assert!(!tip.is_visible());
        tip.pointer_over(b, 0.0, 0.0);
        tip.pointer_out();
        assert!(!tip.is_visible());
    }
}
