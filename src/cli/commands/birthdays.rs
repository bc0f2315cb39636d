use chrono::NaiveDate;
use tabled::{Table, Tabled};

use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_optional};
use crate::entities::birthdays::{Birthday, BirthdayFilter, birthdays};
use crate::store::Remote;

#[derive(Tabled)]
struct BirthdayDisplay {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Age")]
    age: i32,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&Birthday> for BirthdayDisplay {
    fn from(birthday: &Birthday) -> Self {
        Self {
            date: birthday.date.clone(),
            name: birthday.name.clone(),
            age: birthday.age,
            phone: format_optional(birthday.phone.as_deref()),
        }
    }
}

/// List birthdays relative to `today`
pub async fn list_birthdays(
    remote: &dyn Remote,
    filter: BirthdayFilter,
    today: NaiveDate,
    format: &str,
) -> CliResult<String> {
    let list = birthdays(remote, filter, today).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&list)?),
        _ => Ok(format_table(&list, filter)),
    }
}

fn format_table(list: &[Birthday], filter: BirthdayFilter) -> String {
    if list.is_empty() {
        return match filter {
            BirthdayFilter::Today => "No birthdays today.".to_string(),
            BirthdayFilter::Month => "No birthdays this month.".to_string(),
            BirthdayFilter::All => "No birthdays found.".to_string(),
        };
    }

    let display: Vec<BirthdayDisplay> = list.iter().map(|b| b.into()).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    table.to_string()
}
