//! Current Time Tool

use agent_core::{PromptLanguage, Result as CoreResult, Tool, ToolParams};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

/// Canonical tool name
pub const CURRENT_TIME: &str = "CurrentTime";

const DESCRIPTION_EN: &str = "A tool that gets the current time. It takes no input; its output is the current time.";
const DESCRIPTION_ZH: &str = "获取当前时间的工具，它不接受输入，输出是当前时间。";

/// Reads the local system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct CurrentTime {
    language: PromptLanguage,
}

impl CurrentTime {
    pub fn new(language: PromptLanguage) -> Self {
        Self { language }
    }

    pub fn now(&self) -> String {
        asctime(&Local::now())
    }
}

/// Format a time the way C `asctime` does, e.g. `Mon Jan  1 00:00:00 2024`
pub fn asctime<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    let local = time.naive_local();
    format!(
        "{} {:>2} {:02}:{:02}:{:02} {}",
        local.format("%a %b"),
        local.day(),
        local.hour(),
        local.minute(),
        local.second(),
        local.year()
    )
}

#[async_trait]
impl Tool for CurrentTime {
    fn name(&self) -> &str {
        CURRENT_TIME
    }

    fn description(&self) -> &str {
        match self.language {
            PromptLanguage::En => DESCRIPTION_EN,
            PromptLanguage::Zh => DESCRIPTION_ZH,
        }
    }

    async fn call(&self, _params: &ToolParams) -> CoreResult<String> {
        Ok(self.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_asctime_layout() {
        let new_year = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(asctime(&new_year), "Mon Jan  1 00:00:00 2024");

        let later = Utc.with_ymd_and_hms(2023, 11, 23, 14, 5, 9).unwrap();
        assert_eq!(asctime(&later), "Thu Nov 23 14:05:09 2023");
    }

    #[tokio::test]
    async fn test_call_takes_no_params() {
        let tool = CurrentTime::default();
        let output = tool.call(&ToolParams::new()).await.unwrap();
        assert_eq!(output.len(), "Mon Jan  1 00:00:00 2024".len());

        let extra = json!({"timezone": "UTC"}).as_object().cloned().unwrap();
        assert!(tool.validate(&extra).is_err());
    }

    #[test]
    fn test_description_follows_language() {
        assert!(CurrentTime::default().description().starts_with("A tool that gets the current time"));
        assert_eq!(
            CurrentTime::new(PromptLanguage::Zh).description(),
            "获取当前时间的工具，它不接受输入，输出是当前时间。"
        );
    }
}
