use divan::AllocProfiler;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use solo_calculus::{Agent, ParseError, ReductionConfig, alpha_eq, evaluate};

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

#[divan::bench(args = ["u x y", "(x y)(u x | ^u y | p x y)", "!(y)(p x | !(q y))"])]
fn parsing(s: &str) -> Result<Agent, ParseError> {
    Agent::parse(s)
}

#[divan::bench(args = [
    "(x)(u x | ^u y | p x y)",
    "(y)(u y | !(x)(^u x | p x y))",
    "!(y)(p x | !(q y))",
    "(!(x)(u x | q x) | !(y)(^u y | r y))",
])]
fn single_step(bencher: divan::Bencher, s: &str) {
    let agent = Agent::parse(s).unwrap();
    bencher.bench(|| divan::black_box(&agent).reduce());
}

#[divan::bench(args = ["(x y)(u x | ^u y | p x y)", "(x)(!(u x | ^u y | p x y))"])]
fn to_fixpoint(bencher: divan::Bencher, s: &str) {
    let agent = Agent::parse(s).unwrap();
    let config = ReductionConfig::default();
    bencher.bench(|| evaluate(divan::black_box(&agent), &config));
}

#[divan::bench]
fn equivalence(bencher: divan::Bencher) {
    let a = Agent::parse("(x y z)(p x y | q y z | !(w)(r w x) | !(v)(r v z))").unwrap();
    let b = Agent::parse("(c b a)(q b a | p c b | !(v)(r v a) | !(w)(r w c))").unwrap();
    bencher.bench(|| alpha_eq(divan::black_box(&a), divan::black_box(&b)));
}

#[divan::bench]
fn random_terms(bencher: divan::Bencher) {
    let mut r = ChaCha8Rng::seed_from_u64(32);
    let agents: Vec<Agent> = (0..100).map(|_| Agent::random(&mut r)).collect();
    bencher.bench(|| {
        agents
            .iter()
            .map(|x| x.reduce().size())
            .sum::<usize>()
    });
}
