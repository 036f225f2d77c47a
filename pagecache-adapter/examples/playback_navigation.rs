// Example: "next track" navigation over a long library with a small sliding window.
use pagecache::SlidingCacheOptions;
use pagecache_adapter::{MemoryStore, Navigator};

fn main() {
    let library: MemoryStore<String> = (0..100).map(|i| format!("track-{i:03}")).collect();
    let options = SlidingCacheOptions::new(|t: &String| t.clone())
        .with_capacity(30)
        .with_edge_threshold(10);
    let mut nav = Navigator::new(options, library);

    let mut current = nav.first();
    for _ in 0..45 {
        let Some(key) = current.take() else { break };
        current = nav.next(&key);
    }

    let window = nav.cache().window();
    println!(
        "now playing {current:?}; window [{}, {}) of {}; {} fetches",
        window.offset(),
        window.end(),
        window.total_count(),
        nav.store().stats().requested
    );
}
