/// Text shown in symbol popups and legend labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupFormatter {
    pub name_label: String,
    pub value_label: String,
    pub value_units: String,
    pub legend_title: String,
    pub legend_units: String,
}

impl Default for PopupFormatter {
    fn default() -> Self {
        Self {
            name_label: "City".to_string(),
            value_label: "Average August Temperature in".to_string(),
            value_units: "degrees F".to_string(),
            legend_title: "Average August temperature in".to_string(),
            legend_units: "° F".to_string(),
        }
    }
}

impl PopupFormatter {
    pub fn popup(&self, name: &str, year: &str, value: f64) -> String {
        format!(
            "{}: {name}\n{} {year}: {value} {}",
            self.name_label, self.value_label, self.value_units
        )
    }

    pub fn no_data_popup(&self, name: &str, year: &str) -> String {
        format!("{}: {name}\n{} {year}: no data", self.name_label, self.value_label)
    }

    /// Value rounded to two decimals with the legend unit, e.g. `71.35° F`.
    pub fn legend_label(&self, value: f64) -> String {
        let rounded = (value * 100.0).round() / 100.0;
        format!("{rounded}{}", self.legend_units)
    }
}
