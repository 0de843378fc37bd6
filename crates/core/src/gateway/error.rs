use std::fmt;

#[derive(Debug, Clone)]
pub struct GatewayDiagnosticsError {
    pub stage: &'static str,
    pub detail: String,
    pub raw_body: Option<String>,
}

impl GatewayDiagnosticsError {
    /// Short label safe to show next to the apology text.
    pub fn suffix(&self) -> String {
        match self.stage {
            "http" => format!("http {}", self.detail),
            stage => stage.to_string(),
        }
    }
}

impl fmt::Display for GatewayDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "advisory backend error (stage={}): {}", self.stage, self.detail)
    }
}

impl std::error::Error for GatewayDiagnosticsError {}
