//! Example demonstrating the CacheBuilder API across policies.
//!
//! Run with: cargo run --example basic_builder

use evictkit::prelude::*;

fn main() {
    println!("=== CacheBuilder Examples ===\n");

    // Example 1: LRU Cache
    println!("1. LRU Cache");
    let mut lru = CacheBuilder::new()
        .policy(CachePolicy::Lru)
        .capacity(3)
        .build::<u64, String>()
        .unwrap();

    lru.insert(1, "one".to_string()).unwrap();
    lru.insert(2, "two".to_string()).unwrap();
    lru.insert(3, "three".to_string()).unwrap();

    // Access key 1 to make it most recent
    lru.get(&1);

    // Insert key 4, evicts least recent (key 2)
    lru.insert(4, "four".to_string()).unwrap();

    println!("   contains 1? {} (was accessed)", lru.contains(&1));
    println!("   contains 2? {} (evicted as LRU)", lru.contains(&2));
    println!("   keys top→bottom: {:?}", lru.keys());
    println!();

    // Example 2: FIFO vs LIFO
    println!("2. FIFO vs LIFO");
    let mut fifo = CacheBuilder::new()
        .policy(CachePolicy::Fifo)
        .capacity(2)
        .build::<&str, i32>()
        .unwrap();
    let mut lifo = CacheBuilder::new()
        .policy(CachePolicy::Lifo)
        .capacity(2)
        .build::<&str, i32>()
        .unwrap();
    for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
        fifo.insert(key, value).unwrap();
        lifo.insert(key, value).unwrap();
    }
    println!("   fifo: {fifo}");
    println!("   lifo: {lifo}");
    println!();

    // Example 3: LFU Cache
    println!("3. LFU Cache");
    let mut lfu = CacheBuilder::new()
        .policy(CachePolicy::Lfu)
        .capacity(3)
        .build::<&str, i32>()
        .unwrap();
    lfu.insert("a", 1).unwrap();
    lfu.insert("b", 2).unwrap();
    lfu.insert("c", 3).unwrap();
    lfu.get(&"a");
    lfu.get(&"a");
    lfu.get(&"c");
    let outcome = lfu.insert("d", 4).unwrap();
    println!("   evicted: {:?}", outcome.evicted());
    println!("   entries (count): {lfu}");
    println!();

    // Example 4: Priority Cache
    println!("4. Priority Cache");
    let mut priority = CacheBuilder::new()
        .policy(CachePolicy::Priority)
        .capacity(2)
        .build::<&str, &str>()
        .unwrap();
    priority.put(CacheEntry::priority("index", "<html>", 10)).unwrap();
    priority.put(CacheEntry::priority("logo", "<png>", 5)).unwrap();
    let low = priority.put(CacheEntry::priority("tmp", "...", 1)).unwrap();
    let high = priority.put(CacheEntry::priority("api", "{}", 7)).unwrap();
    println!("   tmp admitted? {}", low.is_admitted());
    println!("   api admitted? {} (evicted {:?})", high.is_admitted(), high.evicted());
    println!("   entries (rank): {priority}");
    println!();

    // Example 5: Per-entry TTL with a manual clock
    println!("5. Expire Cache");
    let clock = ManualClock::new(0);
    let mut expire = CacheBuilder::new()
        .policy(CachePolicy::Expire)
        .capacity(4)
        .clock(std::sync::Arc::new(clock.clone()))
        .build::<&str, i32>()
        .unwrap();
    expire.put(CacheEntry::expire("session", 1, 30, TimeUnit::Seconds)).unwrap();
    expire.put(CacheEntry::expire("token", 2, 5, TimeUnit::Seconds)).unwrap();
    clock.advance(10_000);
    println!("   token after 10s: {:?}", expire.get(&"token"));
    println!("   session after 10s: {:?}", expire.get(&"session"));
    println!();

    // Example 6: Metrics
    println!("6. Metrics");
    let mut cache = CacheBuilder::new()
        .capacity(2)
        .metrics(true)
        .build::<u64, u64>()
        .unwrap();
    for key in 0..4 {
        cache.insert(key, key * 10).unwrap();
        cache.get(&key);
        cache.get(&(key + 100));
    }
    let snapshot = cache.metrics().unwrap();
    println!("   {:?}", snapshot.to_map());
    println!("   hit ratio: {:.2}", snapshot.hit_ratio());

    // Example 7: Underflow
    println!();
    println!("7. Underflow");
    cache.clear();
    println!("   poll_bottom on empty: {:?}", cache.poll_bottom());
}

// Expected output:
// === CacheBuilder Examples ===
//
// 1. LRU Cache
//    contains 1? true (was accessed)
//    contains 2? false (evicted as LRU)
//    keys top→bottom: [4, 1, 3]
//
// 2. FIFO vs LIFO
//    fifo: [c: 3, b: 2]
//    lifo: [c: 3, a: 1]
//
// 3. LFU Cache
//    evicted: Some(("b", 2))
//    entries (count): [a: 1 (3), c: 3 (2), d: 4 (1)]
//
// 4. Priority Cache
//    tmp admitted? false
//    api admitted? true (evicted Some(("logo", "<png>")))
//    entries (rank): [index: <html> (10), api: {} (7)]
//
// 5. Expire Cache
//    token after 10s: None
//    session after 10s: Some(1)
//
// 6. Metrics
//    {"capacity": 2, "clears": 0, "evictions": 2, "hits": 4, "misses": 4, "puts": 4, "removes": 0, "size": 2}
//    hit ratio: 0.50
//
// 7. Underflow
//    poll_bottom on empty: Err(Underflow("cannot poll the bottom of an empty cache"))
