use std::path::PathBuf;

/// Deployment knobs for the dashboard: where the workbook lives, which
/// sheet holds the session table, and where the server listens.
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub workbook_path: PathBuf,
    pub sheet_name: String,
    pub bind_address: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from("DonnerEx.xlsx"),
            sheet_name: "DtBaseDate de la séance".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}
