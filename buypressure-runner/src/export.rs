//! Export of dashboard views: JSON for display layers, CSV for spreadsheets.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use buypressure_core::{classify, IndustryGroup, SectorSummary};

use crate::view::DashboardView;

/// Serialize a view to pretty JSON.
pub fn export_view_json(view: &DashboardView) -> Result<String> {
    serde_json::to_string_pretty(view).context("failed to serialize DashboardView to JSON")
}

/// Write the view JSON to `path`.
///
/// Content goes to a sibling temp file first and is renamed into place, so
/// readers never observe a partial file.
pub fn save_view_json(view: &DashboardView, path: &Path) -> Result<()> {
    let json = export_view_json(view)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir: {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .context("failed to write view JSON")?;
    tmp.persist(path)
        .with_context(|| format!("failed to move view JSON into {}", path.display()))?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "saved view JSON");
    Ok(())
}

/// Export the industry matrix as CSV, one row per displayed stock.
///
/// Columns: industry, rs_rating, industry_buy_pressure, industry_status,
/// rank, symbol, company_name, technical_score, screening_score,
/// fundamental_score, buy_pressure, status
pub fn export_matrix_csv(matrix: &[IndustryGroup]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "industry",
        "rs_rating",
        "industry_buy_pressure",
        "industry_status",
        "rank",
        "symbol",
        "company_name",
        "technical_score",
        "screening_score",
        "fundamental_score",
        "buy_pressure",
        "status",
    ])?;

    for group in matrix {
        let ind = &group.industry;
        let ind_status = classify(ind.buy_pressure);
        for (rank, s) in group.stocks.iter().enumerate() {
            wtr.write_record([
                ind.industry.as_str(),
                &format!("{:.0}", ind.rs_rating),
                &format!("{:.3}", ind.buy_pressure),
                ind_status.label(),
                &(rank + 1).to_string(),
                &s.symbol,
                &s.company_name,
                &s.technical_score.to_string(),
                &format!("{:.2}", s.screening_score),
                &format!("{:.2}", s.fundamental_score()),
                &format!("{:.3}", s.buy_pressure),
                s.status().label(),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the sector rollup as CSV, one row per member industry.
pub fn export_sectors_csv(sectors: &[SectorSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "sector",
        "mean_buy_pressure",
        "high_rating_count",
        "member_count",
        "industry",
        "rs_rating",
        "buy_pressure",
    ])?;
    for sector in sectors {
        for ind in &sector.industries {
            wtr.write_record([
                sector.sector.as_str(),
                &format!("{:.3}", sector.mean_buy_pressure),
                &sector.high_rating_count.to_string(),
                &sector.member_count().to_string(),
                &ind.industry,
                &format!("{:.0}", ind.rs_rating),
                &format!("{:.3}", ind.buy_pressure),
            ])?;
        }
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
