//! Manzili: home energy-audit reports.
//!
//! Matches survey answers against a per-locale recommendation catalogue,
//! asks a language model for additional advice, and renders an English or
//! Arabic `.docx` report with the correct text direction throughout.
//!
//! Pipeline: [`audit::AuditRecord`] → [`matcher::match_recommendations`] and
//! [`advisor::NarrativeAdvisor`] → [`composer::compose`] →
//! [`docx::DocxRenderer`], driven by [`report::ReportService`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;

pub mod audit;
pub mod catalogue;
pub mod locale;
pub mod matcher;

pub mod advisor;
pub mod providers;

pub mod composer;
pub mod document;
pub mod docx;

pub mod locks;
pub mod report;
pub mod server;
