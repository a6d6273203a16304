use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use super::{print_json, resolve_date, CmdResult, Session};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate today's schedule
    Generate {
        /// Day to plan for (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Override the configured start clock (HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// Override the configured end clock (HH:MM)
        #[arg(long)]
        end: Option<String>,
        /// Override the session length in minutes
        #[arg(long)]
        session: Option<u32>,
        /// Override the break length in minutes
        #[arg(long = "break")]
        break_minutes: Option<u32>,
    },
    /// Print the current schedule and focus sets
    Show,
    /// Flip a block between done and not done
    Toggle {
        /// Block ID
        id: String,
    },
    /// Pick tomorrow's focus subjects
    Tomorrow {
        /// Reference day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete every subject, the schedule and the timer state
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: PlanAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        PlanAction::Generate {
            date,
            start,
            end,
            session: session_minutes,
            break_minutes,
        } => {
            let mut settings = session.state.settings().clone();
            if let Some(start) = start {
                settings.start_time = start;
            }
            if let Some(end) = end {
                settings.end_time = end;
            }
            if let Some(minutes) = session_minutes {
                settings.session_minutes = minutes;
            }
            if let Some(minutes) = break_minutes {
                settings.break_minutes = minutes;
            }
            session.state.apply_settings(settings);

            let event = session.state.generate(resolve_date(date))?;
            print_json(&event)?;
            print_json(session.state.schedule())?;
        }
        PlanAction::Show => {
            let schedule = session.state.schedule();
            let names = |subjects: &[solostudy_core::Subject]| -> Vec<String> {
                subjects.iter().map(|s| s.name.clone()).collect()
            };
            print_json(&json!({
                "daily_focus": names(session.state.daily_focus()),
                "tomorrow_focus": names(session.state.tomorrow_focus()),
                "total_minutes": schedule.total_minutes(),
                "work_minutes": schedule.work_minutes(),
                "completed": schedule.completed_count(),
                "blocks": schedule,
            }))?;
            return Ok(());
        }
        PlanAction::Toggle { id } => {
            let Some(completed) = session.state.toggle_complete(&id) else {
                return Err(format!("no block with id {id}").into());
            };
            print_json(&json!({ "id": id, "completed": completed }))?;
        }
        PlanAction::Tomorrow { date } => {
            let focus = session.state.reveal_tomorrow(resolve_date(date));
            print_json(focus)?;
        }
        PlanAction::Clear { yes } => {
            if !yes {
                return Err("this deletes all subjects and plans; pass --yes to confirm".into());
            }
            session.state.clear_all(&mut session.db)?;
            println!("all planner data cleared");
            return Ok(());
        }
    }

    session.save()?;
    Ok(())
}
