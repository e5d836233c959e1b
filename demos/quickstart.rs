use solunar::{
    generate_events, timestamp_to_phase, Direction, Granularity, LunarTimeline, TimelineProvider,
    TimelineRequest, Timestamp,
};

fn main() -> solunar::Result<()> {
    let now = Timestamp::now();
    let phase = timestamp_to_phase(now);
    println!("now: {now} ms, {phase}");
    println!("nearest: {}", Granularity::Quarters.classify(phase));

    for event in generate_events(4, now, Direction::Future, Granularity::Quarters) {
        println!("next {:<14} {}", event.phase, event.timestamp);
    }

    let mut lunar = LunarTimeline::new("media", Granularity::Halves);
    let page = lunar.provide(&TimelineRequest::first(4))?;
    for item in &page.items {
        println!("{} {:?}", item.timestamp, item.detail);
    }
    if let Some(cursor) = page.cursor {
        let older = lunar.provide(&TimelineRequest::after(cursor, 2))?;
        println!("{} older events", older.items.len());
    }
    Ok(())
}
