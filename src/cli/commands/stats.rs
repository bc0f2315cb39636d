use tabled::builder::Builder;

use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_optional, truncate_with_ellipsis};
use crate::stats::DashboardStats;
use crate::store::Remote;

/// Print the dashboard counters
pub async fn show_stats(remote: &dyn Remote, recent: usize, format: &str) -> CliResult<String> {
    let stats = DashboardStats::collect(remote, recent).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&stats)?),
        _ => Ok(format_stats(&stats)),
    }
}

fn format_stats(stats: &DashboardStats) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Members", &stats.total_members.to_string()]);
    builder.push_record([
        "Gender (M/F/other)",
        &format!(
            "{} / {} / {}",
            stats.gender.male, stats.gender.female, stats.gender.other
        ),
    ]);
    builder.push_record(["Families", &stats.total_families.to_string()]);
    builder.push_record(["Doctors", &stats.total_doctors.to_string()]);
    builder.push_record(["Committees", &stats.total_committees.to_string()]);
    builder.push_record(["Event applications", &stats.event_applications.to_string()]);
    builder.push_record([
        "Donation applications",
        &stats.donation_applications.to_string(),
    ]);
    builder.push_record(["Pending applications", &stats.pending_applications.to_string()]);

    let mut table = builder.build();
    apply_table_style(&mut table);
    let mut out = table.to_string();

    if !stats.recent_applications.is_empty() {
        let mut recent = Builder::default();
        recent.push_record(["ID", "Event", "Status", "Submitted"]);
        for app in &stats.recent_applications {
            recent.push_record([
                app.id.clone(),
                truncate_with_ellipsis(&format_optional(app.field("name").as_deref()), 40),
                app.status().to_string(),
                format_optional(app.created_at.as_deref()),
            ]);
        }
        let mut table = recent.build();
        apply_table_style(&mut table);
        out.push_str("\nRecent event applications\n");
        out.push_str(&table.to_string());
    }
    out
}
