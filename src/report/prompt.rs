//! Prompt construction for each narrative scenario

use std::fmt::Write;

use crate::models::OwnershipState;
use crate::reconciliation::NarrativeInput;
use crate::reconciliation::scenario::{AggregatingBrief, FullBrief, PublicBrief};

pub fn build_prompt(input: &NarrativeInput, language: &str) -> String {
    let mut prompt = String::new();

    match input {
        NarrativeInput::UnauthorizedFallback(brief) => unauthorized_prompt(&mut prompt, brief),
        NarrativeInput::AggregatingFallback(brief) => aggregating_prompt(&mut prompt, brief),
        NarrativeInput::FullAnalysis(brief) => full_prompt(&mut prompt, brief),
    }

    let _ = write!(
        prompt,
        "\nRespond in {language}, formatted as Markdown."
    );
    prompt
}

fn public_facts(prompt: &mut String, brief: &PublicBrief) {
    let _ = writeln!(
        prompt,
        "Video title: {} (published {})",
        brief.title, brief.published_on
    );
    let _ = writeln!(
        prompt,
        "Public counters: {} views, {} likes, {} comments",
        brief.view_count, brief.like_count, brief.comment_count
    );
    if brief.view_count > 0 {
        let _ = writeln!(
            prompt,
            "Engagement: {:.2}% likes per view, {:.2}% comments per view",
            percent(brief.like_count, brief.view_count),
            percent(brief.comment_count, brief.view_count)
        );
    }
}

fn unauthorized_prompt(prompt: &mut String, brief: &PublicBrief) {
    public_facts(prompt, brief);

    let reason = match brief.ownership_state {
        OwnershipState::Mismatch => {
            "The signed-in account does not appear to own this video, so private analytics are unavailable."
        }
        _ => "Private analytics for this video could not be accessed.",
    };
    let _ = writeln!(prompt, "\n{reason}");
    let _ = writeln!(
        prompt,
        "Start by stating this limitation in one sentence. Then suggest ways to raise views \
         and engagement using only the public counters above, plus click-worthy title and \
         thumbnail ideas. Do not guess watch time, retention or traffic sources."
    );
}

fn aggregating_prompt(prompt: &mut String, brief: &AggregatingBrief) {
    public_facts(prompt, &brief.public);

    match brief.window {
        Some(window) => {
            let _ = writeln!(
                prompt,
                "\nAnalytics for {} to {} are still being aggregated and are not yet complete.",
                window.start_date, window.end_date
            );
        }
        None => {
            let _ = writeln!(prompt, "\nAnalytics are still being aggregated and are not yet complete.");
        }
    }
    let _ = writeln!(
        prompt,
        "Start by explaining that detailed analytics usually settle within a few days. \
         Low or missing watch time here means the data has not arrived, not that viewers \
         left early; do not draw retention conclusions. Suggest early promotion ideas and \
         click-worthy title and thumbnail ideas based on the public counters."
    );
}

fn full_prompt(prompt: &mut String, brief: &FullBrief) {
    public_facts(prompt, &brief.public);

    if let Some(window) = brief.window {
        let _ = writeln!(
            prompt,
            "Analytics window: {} to {}",
            window.start_date, window.end_date
        );
    }
    let _ = writeln!(
        prompt,
        "Analytics: {} views, {} minutes watched in total, {:.0} seconds average view duration",
        brief.aggregated_view_count, brief.watched_minutes, brief.average_watch_seconds
    );

    if brief.traffic_breakdown.is_empty() {
        let _ = writeln!(prompt, "Traffic sources: none reported");
    } else {
        let _ = writeln!(prompt, "Traffic sources:");
        for source in &brief.traffic_breakdown {
            let _ = writeln!(prompt, "- {}: {} views", source.source_type, source.view_count);
        }
    }

    let _ = writeln!(
        prompt,
        "\nBased on this data, propose concrete strategies to increase views and watch time, \
         and suggest click-worthy title and thumbnail ideas."
    );
}

fn percent(part: u64, whole: u64) -> f64 {
    part as f64 * 100.0 / whole as f64
}
