use solo_calculus::{Agent, CanonicalAgent, ReductionConfig, ReductionError, alpha_eq, evaluate};

fn build(s: &str) -> anyhow::Result<Agent> {
    Ok(Agent::parse(s)?)
}

#[test]
fn multiset_fidelity() -> anyhow::Result<()> {
    assert!(!alpha_eq(&build("(x)(p x | p x)")?, &build("(x)(p x)")?));
    Ok(())
}

#[test]
fn alpha_equivalence() -> anyhow::Result<()> {
    assert!(alpha_eq(&build("(x)(p x)")?, &build("(y)(p y)")?));
    assert!(!alpha_eq(&build("(x)(p x)")?, &build("(x)(p y)")?));
    Ok(())
}

#[test]
fn standard_fusion() -> anyhow::Result<()> {
    let reduct = build("(x)(u x | ^u y | p x y)")?.reduce();
    assert!(alpha_eq(&reduct, &build("p y y")?));
    Ok(())
}

#[test]
fn both_bound_fusion() -> anyhow::Result<()> {
    let reduct = build("(x y)(u x | ^u y | p x y)")?.reduce();
    assert!(alpha_eq(&reduct, &build("(z)(p z z)")?));
    assert_eq!(reduct.to_string(), "(u0)(p u0 u0)");
    Ok(())
}

#[test]
fn flattening_theorem() -> anyhow::Result<()> {
    let reduct = build("!(y)(p x | !(q y))")?.reduce();
    assert!(alpha_eq(
        &reduct,
        &build("(c)(!(y)(p x | c q y) | !(a b)(^c a b | a b))")?
    ));
    let canonical = CanonicalAgent::new(&reduct);
    assert!(canonical.replicators.iter().all(|x| x.replicators.is_empty()));
    Ok(())
}

#[test]
fn cross_replicator_fusion() -> anyhow::Result<()> {
    let reduct = build("(y)(u y | !(x)(^u x | p x y))")?.reduce();
    assert!(alpha_eq(
        &reduct,
        &build("(u0)(p u0 u0 | !(x)(^u x | p x u0))")?
    ));
    Ok(())
}

#[test]
fn fixpoint_by_equivalence() -> anyhow::Result<()> {
    for s in [
        "(x)(u x | ^u y | p x y)",
        "(x y)(u x | ^u y | p x y)",
        "(u x | ^u y | p x y)",
        "(y)(u y | !(x)(^u x | p x y))",
        "(x)(!(u x | ^u y | p x y))",
    ] {
        let evaluation = evaluate(&build(s)?, &ReductionConfig::default())?;
        let last = evaluation.result();
        assert!(alpha_eq(last, &last.reduce()), "{s} ended on {last}");
    }
    Ok(())
}

#[test]
fn unbounded_terms_run_out_of_steps() -> anyhow::Result<()> {
    // every copy of the outer body releases another q
    let agent = build("!(y)(p x | !(q y))")?;
    assert_eq!(
        evaluate(&agent, &ReductionConfig::new(8)),
        Err(ReductionError::StepBudgetExhausted { steps: 8 })
    );
    Ok(())
}

#[test]
fn free_names_are_conserved() -> anyhow::Result<()> {
    for s in [
        "(x)(u x | ^u y | p x y)",
        "(x y)(u x | ^u y | p x y)",
        "(y)(u y | !(x)(^u x | p x y))",
        "!(y)(p x | !(q y))",
        "((x)(p x) | q x)",
    ] {
        let agent = build(s)?;
        let reduct = agent.reduce();
        assert!(
            reduct.free_names().is_subset(&agent.free_names()),
            "{agent} reduced to {reduct}"
        );
    }
    Ok(())
}

#[test]
fn duplicated_replicators_are_kept() -> anyhow::Result<()> {
    let agent = build("(!(p x) | !(p x) | q)")?;
    assert!(!alpha_eq(&agent, &build("(!(p x) | q)")?));
    assert!(alpha_eq(&agent.reduce(), &agent));
    Ok(())
}

#[cfg(feature = "sampling")]
mod random {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn alpha_eq_is_reflexive() {
        let mut r = ChaCha8Rng::seed_from_u64(32);
        for _ in 0..500 {
            let agent = Agent::random(&mut r);
            assert!(alpha_eq(&agent, &agent), "{agent}");
        }
    }

    #[test]
    fn flatten_preserves_equivalence() {
        let mut r = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let agent = Agent::random(&mut r);
            let flat = agent.flatten();
            assert!(alpha_eq(&agent, &flat), "{agent} flattened to {flat}");
            assert_eq!(flat.free_names(), agent.free_names());
        }
    }

    #[test]
    fn reduction_never_frees_names() {
        let mut r = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let agent = Agent::random(&mut r);
            let reduct = agent.reduce();
            assert!(
                reduct.free_names().is_subset(&agent.free_names()),
                "{agent} reduced to {reduct}"
            );
        }
    }
}
