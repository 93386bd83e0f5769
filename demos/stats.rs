//! Fill a few dictionaries the way a chat daemon would and print the
//! diagnostics sweep over all of them.
//!
//! Run: `cargo run --example stats -- --users 5000 --lookups 20000`

use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use splay_dict::{comparator, Dictionary, DictionaryBuilder, Registry};
use tracing::{info, Level};

#[derive(Parser)]
struct Cli {
    /// Number of nicknames to register
    #[arg(short, long, default_value_t = 1_000)]
    users: usize,
    /// Number of random nickname lookups to run before printing stats
    #[arg(short, long, default_value_t = 10_000)]
    lookups: usize,
    /// Number of channels to create
    #[arg(short, long, default_value_t = 50)]
    channels: usize,
    /// Seed for the random workload
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let cli = Cli::parse();
    let users = cli.users.max(1);
    let mut rng = StdRng::seed_from_u64(cli.seed);

    let registry = Registry::new();

    let mut nicks: Dictionary<String, usize> =
        DictionaryBuilder::new(comparator::rfc1459_case_insensitive)
            .name("nicknames")
            .capacity(users)
            .build(&registry);
    let mut channels: Dictionary<String, Vec<usize>> =
        registry.create("channels", comparator::ascii_case_insensitive);
    let mut ids: Dictionary<usize, String> = registry.create("user ids", comparator::natural);

    for id in 0..users {
        let nick = format!("User[{}]", id);

        ids.add(id, nick.clone());
        if nicks.insert(nick, id).is_some() {
            info!(id, "Nickname collision");
        }
    }

    for channel in 0..cli.channels {
        let members = (0..rng.gen_range(1..20))
            .map(|_| rng.gen_range(0..users))
            .collect();

        channels.add(format!("#Channel{}", channel), members);
    }

    let mut hits = 0;
    for _ in 0..cli.lookups {
        // Other case and bracket style, to exercise folding.
        let nick = format!("user{{{}}}", rng.gen_range(0..users * 2));

        if nicks.find(&nick).is_some() {
            hits += 1;
        }
    }
    info!(hits, misses = cli.lookups - hits, "Lookups done");

    // Drop every user that is in no channel.
    let mut joined = Vec::new();
    for (_, members) in channels.iter() {
        joined.extend(members.iter().copied());
    }
    nicks.foreach(|nicks, handle| {
        let idle = nicks
            .value(handle)
            .map_or(false, |id| !joined.contains(id));

        if idle {
            let _ = nicks.remove_element(handle);
        }
    });

    for (id, nick) in ids.iter().take(3) {
        info!(id, %nick, rank = ?nicks.linear_index(nick), "Early user");
    }

    println!(
        "{:<30} {:<15} {:<10} {:<10} {:<10} {:<10}",
        "NAME", "KIND", "COUNT", "DEPTHSUM", "AVGDEPTH", "MAXDEPTH"
    );
    registry.stats_walk(|line| println!("{}", line));
}
