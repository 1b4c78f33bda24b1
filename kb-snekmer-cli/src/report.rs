//! Plain-text report assembly.
//!
//! The report service renders whatever text it is given; operations build
//! their summary from sections of metrics and key-value pairs so every
//! report reads the same way.

pub struct Metric {
    label: String,
    value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

enum Section {
    Metrics(String, Vec<Metric>),
    KeyValue(String, Vec<(String, String)>),
    Text(String),
}

pub struct TextReport {
    title: String,
    sections: Vec<Section>,
}

impl TextReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn metrics(mut self, title: impl Into<String>, metrics: Vec<Metric>) -> Self {
        self.sections.push(Section::Metrics(title.into(), metrics));
        self
    }

    pub fn key_value(mut self, title: impl Into<String>, items: Vec<(String, String)>) -> Self {
        self.sections.push(Section::KeyValue(title.into(), items));
        self
    }

    #[allow(dead_code)]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.sections.push(Section::Text(body.into()));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');

        for section in &self.sections {
            out.push('\n');
            match section {
                Section::Metrics(title, metrics) => {
                    out.push_str(&format!("{}:\n", title));
                    for metric in metrics {
                        out.push_str(&format!("  {}: {}\n", metric.label, metric.value));
                    }
                }
                Section::KeyValue(title, items) => {
                    out.push_str(&format!("{}:\n", title));
                    for (key, value) in items {
                        out.push_str(&format!("  {} = {}\n", key, value));
                    }
                }
                Section::Text(body) => {
                    out.push_str(body);
                    out.push('\n');
                }
            }
        }

        out
    }
}
