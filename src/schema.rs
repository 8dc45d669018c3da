use crate::dataset::Dataset;

/// The five required column names, in their exact post-normalization
/// form.
///
/// The defaults are the production workbook's headers after header
/// mangling (accents dropped, spaces underscored). The struct is plain
/// data so tests and alternate deployments can substitute their own
/// names.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSchema {
    pub therapist: String,
    pub therapy_type: String,
    pub cost: String,
    pub duration: String,
    pub participants: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            therapist: "Nom_du_thrapeute".into(),
            therapy_type: "Type_de_thrapie".into(),
            cost: "Cot_total_de_la_sance".into(),
            duration: "Dure_de_la_sance".into(),
            participants: "Nombre_de_participants".into(),
        }
    }
}

impl ColumnSchema {
    /// The required columns in their fixed declared order. Validation
    /// reports the first of these that is missing.
    pub fn required_columns(&self) -> [&str; 5] {
        [
            &self.therapist,
            &self.therapy_type,
            &self.cost,
            &self.duration,
            &self.participants,
        ]
    }

    /// First required column absent from the dataset, if any. Stops at
    /// the first miss; later columns are not checked.
    pub fn first_missing_column(&self, dataset: &Dataset) -> Option<&str> {
        self.required_columns()
            .into_iter()
            .find(|column| !dataset.has_column(column))
    }

    /// True iff every required column is present.
    pub fn validate(&self, dataset: &Dataset) -> bool {
        self.first_missing_column(dataset).is_none()
    }
}
