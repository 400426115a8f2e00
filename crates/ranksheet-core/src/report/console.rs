use crate::model::{Ack, RankReport};

pub fn print_ack(ack: &Ack) {
    println!(
        "Recorded. Raw score: {:.2} (row {}, {})",
        ack.raw_score, ack.row_id, ack.recorded_at
    );
}

pub fn print_rank_report(report: &RankReport) {
    println!("Candidate: {}", report.name);
    println!("Raw score: {:.2}", report.raw_score);
    println!(
        "Overall rank: {} of {} ({} tied at this score)",
        report.overall.rank, report.overall.population, report.overall.tied
    );
    println!(
        "Shift {} rank: {} of {} ({} tied)",
        report.shift_id, report.shift.rank, report.shift.population, report.shift.tied
    );
    println!(
        "Category {} rank: {} of {} ({} tied)",
        report.category_id, report.category.rank, report.category.population, report.category.tied
    );
    if !report.persisted {
        eprintln!("note: ranks computed but could not be saved back to the sheet");
    }
}
