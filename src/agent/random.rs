use rand::Rng;

use super::{Agent, Parity, Solo};
use crate::Name;

const NAMES: [&str; 6] = ["u", "v", "p", "x", "y", "z"];
const MAX_DEPTH: u8 = 3;
const RECURSE_PROB: f64 = 0.6;

fn random_name(r: &mut impl Rng) -> Name {
    Name::from(NAMES[r.random_range(0..NAMES.len())])
}

impl Solo {
    fn random(r: &mut impl Rng) -> Self {
        let subject = random_name(r);
        let arity = r.random_range(0..=2);
        let objects: Vec<Name> = (0..arity).map(|_| random_name(r)).collect();
        let parity = if r.random_bool(0.5) {
            Parity::Input
        } else {
            Parity::Output
        };
        Solo::new(subject, objects, parity)
    }
}

impl Agent {
    fn random_inner(r: &mut impl Rng, depth: u8) -> Self {
        if depth < MAX_DEPTH && r.random_bool(RECURSE_PROB) {
            match r.random_range(0..4) {
                0 | 1 => {
                    let n = r.random_range(2..=3);
                    Agent::Composition((0..n).map(|_| Agent::random_inner(r, depth + 1)).collect())
                }
                2 => {
                    let n = r.random_range(1..=2);
                    let scope: Vec<&str> = (0..n)
                        .map(|_| NAMES[r.random_range(2..NAMES.len())])
                        .collect();
                    Agent::scope(scope, Agent::random_inner(r, depth + 1))
                }
                _ => Agent::replication(Agent::random_inner(r, depth + 1)),
            }
        } else if r.random_bool(0.1) {
            Agent::Inaction
        } else {
            Agent::Solo(Solo::random(r))
        }
    }

    ///Get a random, small term over a handful of names.
    pub fn random(r: &mut impl Rng) -> Self {
        Agent::random_inner(r, 0)
    }
}
