//! Report rendering from embedded templates

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::entities::{AnalysisRecord, FrameworkProject, LegalFramework};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const COMPLIANCE_TEMPLATE: &str = "compliance_report.txt.tera";

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    #[diagnostic(code(sbench::report::template_not_found))]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    #[diagnostic(code(sbench::report::render))]
    RenderError(String),

    #[error("Analysis {0} has no results yet")]
    #[diagnostic(
        code(sbench::report::no_results),
        help("Run 'sbench analyze' and wait for it to complete")
    )]
    NoResults(String),
}

/// Everything a compliance report is built from
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub project: &'a FrameworkProject,
    pub framework: &'a LegalFramework,
    pub document_name: &'a str,
    pub analysis: &'a AnalysisRecord,
    pub generated: DateTime<Utc>,
}

pub struct ReportGenerator {
    tera: Tera,
}

impl ReportGenerator {
    /// Create a report generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                let template_str = std::str::from_utf8(&content.data)
                    .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                tera.add_raw_template(filename, template_str)
                    .map_err(|e| TemplateError::RenderError(e.to_string()))?;
            }
        }

        Ok(Self { tera })
    }

    /// Render the plain-text compliance report
    pub fn compliance_report(&self, ctx: &ReportContext<'_>) -> Result<String, TemplateError> {
        let summary = ctx
            .analysis
            .summary
            .as_ref()
            .ok_or_else(|| TemplateError::NoResults(ctx.analysis.id.to_string()))?;

        if !self.tera.get_template_names().any(|n| n == COMPLIANCE_TEMPLATE) {
            return Err(TemplateError::NotFound(COMPLIANCE_TEMPLATE.to_string()));
        }

        let mut context = tera::Context::new();
        context.insert("project", ctx.project);
        context.insert("framework", ctx.framework);
        context.insert("document_name", ctx.document_name);
        context.insert("summary", summary);
        context.insert("score", &summary.compliance_score);
        context.insert("level", summary.level().label());
        context.insert(
            "analysis_date",
            &ctx.analysis.created.format("%Y-%m-%d").to_string(),
        );
        context.insert(
            "effective_date",
            ctx.framework.effective_date.as_deref().unwrap_or("n/a"),
        );
        context.insert(
            "generated",
            &ctx.generated.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );

        self.tera
            .render(COMPLIANCE_TEMPLATE, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

/// Default file name for a compliance report
pub fn report_filename(project: &FrameworkProject, date: DateTime<Utc>) -> String {
    let name: String = project
        .name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    format!(
        "sustainability-analysis-report-{}-{}.txt",
        name,
        date.format("%Y-%m-%d")
    )
}
