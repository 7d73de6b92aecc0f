//! Latest-wins example for zonium-rs
//!
//! Simulates fast typing against a mapper whose latency varies per query:
//! earlier, slower queries finish *after* later ones, yet only the final
//! query's result reaches the handler.

use std::convert::Infallible;
use std::time::Duration;
use zonium_core::LatestWinsStream;

#[tokio::main]
async fn main() {
    println!("=== zonium-rs Latest-Wins Stream ===\n");

    let stream = LatestWinsStream::new(
        |text: String| async move {
            // Shorter queries are "slower", so results arrive out of order.
            let delay = 200 / text.len() as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            println!("  mapped {text:?} after {delay} ms");
            Ok::<_, Infallible>(text.to_uppercase())
        },
        |outcome| match outcome {
            Ok(result) => println!("  handler got {result:?}"),
            Err(e) => match e {},
        },
    );

    for text in ["l", "lo", "lon", "lond"] {
        println!("submit {text:?}");
        stream.submit(text.to_string());
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    println!("\nsubmit \"paris\" then abort");
    stream.submit("paris".to_string());
    stream.abort();
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("\ndestroy, then submit \"tokyo\"");
    stream.destroy();
    println!("  accepted: {}", stream.submit("tokyo".to_string()).is_some());
}
