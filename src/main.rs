use sieve_kv::SieveCache;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let capacity = match std::env::args().nth(1).map(|arg| arg.parse::<usize>()) {
        None => 3,
        Some(Ok(capacity)) => capacity,
        Some(Err(err)) => {
            eprintln!("invalid capacity: {err}");
            std::process::exit(2);
        }
    };
    let mut cache: SieveCache<String, String> = match SieveCache::new(capacity) {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    cache.insert("foo".to_string(), "foocontent".to_string());
    cache.insert("bar".to_string(), "barcontent".to_string());
    cache.remove("bar");
    cache.insert("bar2".to_string(), "bar2content".to_string());
    cache.insert("bar3".to_string(), "bar3content".to_string());
    println!("{:?}", cache.get("foo"));
    println!("{:?}", cache.get("bar"));
    cache.insert("bar4".to_string(), "bar4content".to_string());
    println!("{:?}", cache.get("bar2"));
    println!("{:?}", cache.get("bar3"));

    info!(len = cache.len(), capacity = cache.capacity(), "final state");
    println!("{:?}", cache);
}
