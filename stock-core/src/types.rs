use std::fmt;

/// Позиция склада: товар или процедура.
///
/// `id == 0` означает "ещё не сохранён": настоящий id выдаёт хранилище при `add`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub minutes: i32,
    pub is_procedure: bool,
}

impl Stock {
    /// Id, который несёт ещё не сохранённая запись
    pub const UNASSIGNED_ID: u32 = 0;

    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        minutes: i32,
        is_procedure: bool,
    ) -> Self {
        Self {
            id: Self::UNASSIGNED_ID,
            name: name.into(),
            description: description.into(),
            price,
            minutes,
            is_procedure,
        }
    }

    /// Та же запись с другим id
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Обрезает пробелы в `name` и `description` (так запись и попадает в файл).
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_procedure { "procedure" } else { "supply" };
        write!(
            f,
            "#{} {} ({kind}, {:.2}, {} min)",
            self.id, self.name, self.price, self.minutes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stock_is_unassigned() {
        let s = Stock::new("Bandage", "supply", 5.0, 0, false);
        assert_eq!(s.id, Stock::UNASSIGNED_ID);
        assert_eq!(s.with_id(7).id, 7);
    }

    #[test]
    fn normalized_trims_text_fields_only() {
        let s = Stock::new("  Consult \t", "\n30 min visit  ", 50.0, 30, true).normalized();
        assert_eq!(s.name, "Consult");
        assert_eq!(s.description, "30 min visit");
        assert_eq!(s.minutes, 30);
    }

    #[test]
    fn normalized_keeps_inner_line_breaks() {
        let s = Stock::new("X", " line one\nline two ", 1.0, 0, false).normalized();
        assert_eq!(s.description, "line one\nline two");
    }

    #[test]
    fn display_is_short_summary() {
        let s = Stock::new("Consult", "visit", 50.0, 30, true).with_id(1);
        assert_eq!(s.to_string(), "#1 Consult (procedure, 50.00, 30 min)");
    }
}
