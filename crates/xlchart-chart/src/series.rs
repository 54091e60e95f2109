//! Data series types

/// Data series for a chart
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    /// Series name, shown in the legend
    pub name: Option<DataReference>,
    /// Values (Y data)
    pub values: DataReference,
    /// Categories (X data)
    pub categories: Option<DataReference>,
    /// Draw the line as a smoothed curve
    pub smooth: bool,
}

impl DataSeries {
    /// Create a new data series
    pub fn new(values: DataReference) -> Self {
        Self {
            name: None,
            values,
            categories: None,
            smooth: false,
        }
    }

    /// Set series name
    pub fn with_name(mut self, name: DataReference) -> Self {
        self.name = Some(name);
        self
    }

    /// Set categories
    pub fn with_categories(mut self, categories: DataReference) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Smooth the series line
    pub fn smoothed(mut self) -> Self {
        self.smooth = true;
        self
    }
}

/// Sheet-qualified formula reference to chart data, e.g. `Sheet1!$A$1:$A$10`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataReference(String);

impl DataReference {
    /// Create a formula reference
    pub fn formula<S: Into<String>>(formula: S) -> Self {
        DataReference(formula.into())
    }

    /// The formula, without a leading `=`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
