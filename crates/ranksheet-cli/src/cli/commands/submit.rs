use ranksheet_core::errors::RecordError;
use ranksheet_core::model::{Identity, Submission};
use ranksheet_core::recorder::ScoreRecorder;
use ranksheet_core::report::console;
use ranksheet_core::storage::store::Store;

use super::{ensure_parent_dir, exit_codes};
use crate::cli::args::SubmitArgs;

pub fn run(args: SubmitArgs) -> anyhow::Result<i32> {
    ensure_parent_dir(&args.db)?;
    let store = Store::open(&args.db)?;
    let recorder = ScoreRecorder::new(store);

    let submission = Submission {
        identity: Identity {
            name: args.name,
            email: args.email,
        },
        device_id: args.device_id,
        category: args.category,
        shift: args.shift,
        attempted: args.attempted,
        correct: args.correct,
        wrong: args.wrong,
    };

    match recorder.record(&submission) {
        Ok(ack) => {
            if args.format == "json" {
                println!("{}", serde_json::to_string_pretty(&ack)?);
            } else {
                console::print_ack(&ack);
            }
            Ok(exit_codes::OK)
        }
        Err(RecordError::Invalid(e)) => {
            eprintln!("rejected: {}", e);
            Ok(exit_codes::REJECTED)
        }
        Err(RecordError::Storage(e)) => Err(e.context("record submission")),
    }
}
