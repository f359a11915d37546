//! Two timelines on one page.
//!
//! Each keeps its own playback, scrub position and smoothing. With linking
//! on, settling one timeline on an entry moves the other to the same entry.

use careerline::prelude::*;
use simple_logger::SimpleLogger;

fn main() -> eframe::Result {
    if let Err(err) = SimpleLogger::new().init() {
        eprintln!("logger already initialized: {err}");
    }

    let records = sample_records();
    let mut app = PortfolioApp::with_fetch(Fetch::Ready(Vec::new()), TimelineConfig::default())
        .link_timelines(true);

    app.push_card(Box::new(TextCard::new(
        "Two views, one history",
        "The first timeline autoplays from the first role. The second starts at the latest \
         role and follows whichever entry the first settles on.",
    )));
    app.add_timeline(
        "Autoplay",
        &records,
        TimelineConfig::default()
            .initial_index(0)
            .autoplay(true)
            .autoplay_interval_ms(600)
            .top_n(3),
    );
    app.add_timeline(
        "Follower",
        &records,
        TimelineConfig::default().step_years(1.0).smoothing_ms(250),
    );

    app.run("careerline: two timelines")
}
