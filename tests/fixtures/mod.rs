//! Shared builders for audit answers and a scripted narrative provider.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use manzili::audit::AuditRecord;
use manzili::locale::{Field, Locale};
use manzili::providers::{
    CompletionRequest, CompletionResponse, LlmProvider, ProviderError, StopReason, UsageStats,
};

/// Sample answer for a field, in the form language of `locale`.
pub fn sample_value(locale: Locale, field: Field) -> &'static str {
    match (locale, field) {
        (_, Field::ReportNumber) => "007",
        (_, Field::DateOfAudit) => "2024-03-14",
        (_, Field::ContactNumber) => "+971 50 000 0000",
        (_, Field::HouseNumber) => "12",
        (_, Field::YearOfConstruction) => "2009",
        (_, Field::NumberOfBedrooms) => "4",
        (_, Field::NumberOfFloors) => "2",
        (_, Field::NumberOfResidents) => "6",
        (Locale::English, Field::Homeowner) => "Mariam Saeed",
        (Locale::English, Field::Location) => "Al Nakheel",
        (Locale::English, Field::TypeOfAccommodation) => "Villa",
        (Locale::English, Field::OutdoorGarden) => "Drip irrigation, lawn",
        (Locale::English, Field::SwimmingPool) => "None",
        (Locale::English, Field::AcSystems) => "Split units in every room",
        (Locale::English, Field::Lighting) => "Mostly halogen",
        (Locale::English, Field::WaterTaps) => "No aerators",
        (Locale::English, Field::WaterHeaters) => "Two electric tanks",
        (Locale::English, Field::Other) => "Single glazing",
        (Locale::Arabic, Field::Homeowner) => "مريم سعيد",
        (Locale::Arabic, Field::Location) => "النخيل",
        (Locale::Arabic, Field::TypeOfAccommodation) => "فيلا",
        (Locale::Arabic, Field::OutdoorGarden) => "ري بالتنقيط",
        (Locale::Arabic, Field::SwimmingPool) => "لا يوجد",
        (Locale::Arabic, Field::AcSystems) => "وحدات منفصلة",
        (Locale::Arabic, Field::Lighting) => "هالوجين",
        (Locale::Arabic, Field::WaterTaps) => "بدون مهويات",
        (Locale::Arabic, Field::WaterHeaters) => "سخانان كهربائيان",
        (Locale::Arabic, Field::Other) => "زجاج مفرد",
    }
}

/// Every required field filled in, no recommendation ticked.
pub fn answers(locale: Locale) -> BTreeMap<String, String> {
    Field::REQUIRED
        .iter()
        .map(|field| {
            (
                locale.field_key(*field).to_owned(),
                sample_value(locale, *field).to_owned(),
            )
        })
        .collect()
}

/// Tick catalogue entry `key` with a priority label and a location.
pub fn tick(answers: &mut BTreeMap<String, String>, key: &str, tier_label: &str, detail: &str) {
    answers.insert(key.to_owned(), "on".to_owned());
    answers.insert(format!("dropdown_{key}"), tier_label.to_owned());
    answers.insert(format!("input_{key}"), detail.to_owned());
}

/// Wrap answers as a record.
pub fn record(answers: BTreeMap<String, String>) -> AuditRecord {
    AuditRecord::from_map(answers)
}

/// Provider returning a fixed reply after an optional delay, recording prompts.
pub struct ScriptedProvider {
    reply: Result<String, u16>,
    delay: Duration,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// Always answer with `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_owned()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with HTTP `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            ..Self::replying("")
        }
    }

    /// Wait `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.extend(request.messages.into_iter().map(|m| m.content));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.reply {
            Ok(text) => Ok(CompletionResponse {
                text: text.clone(),
                stop_reason: StopReason::EndTurn,
                usage: UsageStats::default(),
                model: "scripted-1".to_owned(),
            }),
            Err(status) => Err(ProviderError::HttpStatus {
                status: *status,
                body: "scripted failure".to_owned(),
            }),
        }
    }

    fn model_id(&self) -> &str {
        "scripted/scripted-1"
    }
}
