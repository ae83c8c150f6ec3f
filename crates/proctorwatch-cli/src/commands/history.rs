use clap::Subcommand;
use proctorwatch_core::ReportStore;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recent reports, newest first
    List {
        /// Maximum number of reports
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Only reports for this subject
        #[arg(long)]
        subject: Option<String>,
    },
    /// Print one report
    Show {
        /// Session id
        id: String,
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Totals across all stored reports
    Summary,
    /// Delete one report
    Delete {
        /// Session id
        id: String,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ReportStore::open()?;

    match action {
        HistoryAction::List { limit, subject } => {
            let reports = store.list_reports(limit, subject.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        HistoryAction::Show { id, json } => {
            let report = store.get_report(Uuid::parse_str(&id)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        HistoryAction::Summary => {
            let summary = store.summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        HistoryAction::Delete { id } => {
            if !store.delete_report(Uuid::parse_str(&id)?)? {
                return Err(format!("no session report with id {id}").into());
            }
            println!("deleted {id}");
        }
    }
    Ok(())
}
