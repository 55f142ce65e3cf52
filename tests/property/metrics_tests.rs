//! Property-based tests for the closed-form queue metrics

use proptest::prelude::*;
use mms_queue::engine::compute_metrics;
use mms_queue::{Metrics, Outcome};

fn stable(lambda: f64, mu: f64, servers: u32) -> Metrics {
    match compute_metrics(lambda, mu, servers).unwrap() {
        Outcome::Stable(metrics) => metrics,
        Outcome::Unstable(i) => panic!("expected a stable system, got rho = {}", i.rho),
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    /// Little's law holds for the queue and for the whole system
    #[test]
    fn test_littles_law(
        lambda in 0.01f64..100.0,
        utilization in 0.01f64..0.95,
        servers in 1u32..=50,
    ) {
        let mu = lambda / (servers as f64 * utilization);
        let m = stable(lambda, mu, servers);

        prop_assert!(close(m.lq, lambda * m.wq), "Lq {} vs λ·Wq {}", m.lq, lambda * m.wq);
        prop_assert!(close(m.ls, lambda * m.ws), "Ls {} vs λ·Ws {}", m.ls, lambda * m.ws);
    }

    /// Time in system exceeds time in queue by exactly one mean service time
    #[test]
    fn test_service_time_gap(
        lambda in 0.01f64..100.0,
        utilization in 0.01f64..0.95,
        servers in 1u32..=50,
    ) {
        let mu = lambda / (servers as f64 * utilization);
        let m = stable(lambda, mu, servers);

        prop_assert!(close(m.ws - m.wq, 1.0 / mu), "Ws - Wq = {}, 1/μ = {}", m.ws - m.wq, 1.0 / mu);
    }

    /// For one server the system holds rho more customers than the queue
    #[test]
    fn test_single_server_occupancy(
        mu in 0.1f64..100.0,
        utilization in 0.01f64..0.99,
    ) {
        let lambda = mu * utilization;
        let m = stable(lambda, mu, 1);

        prop_assert!((m.ls - m.lq - m.rho).abs() < 1e-9);
        prop_assert!((m.p0 - (1.0 - m.rho)).abs() < 1e-12);
    }

    /// Probabilities and averages stay in range
    #[test]
    fn test_metrics_in_range(
        lambda in 0.01f64..100.0,
        utilization in 0.01f64..0.99,
        servers in 1u32..=600,
    ) {
        let mu = lambda / (servers as f64 * utilization);
        let m = stable(lambda, mu, servers);

        prop_assert!(m.p0 > 0.0 && m.p0 <= 1.0, "P0 = {}", m.p0);
        prop_assert!(m.lq >= 0.0 && m.lq.is_finite());
        prop_assert!(m.ls >= m.lq);
        prop_assert!(m.ws >= m.wq && m.wq >= 0.0);
    }

    /// Heavier traffic strictly lengthens the queue and every wait
    #[test]
    fn test_monotone_in_arrival_rate(
        mu in 0.1f64..100.0,
        servers in 1u32..=20,
        // below rho = 0.2 on twenty servers Wq drops under the f64 resolution of 1/mu
        low in 0.2f64..0.9,
        step in 0.001f64..0.09,
    ) {
        let capacity = servers as f64 * mu;
        let a = stable(low * capacity, mu, servers);
        let b = stable((low + step) * capacity, mu, servers);

        prop_assert!(b.lq > a.lq, "Lq {} -> {}", a.lq, b.lq);
        prop_assert!(b.ls > a.ls, "Ls {} -> {}", a.ls, b.ls);
        prop_assert!(b.wq > a.wq, "Wq {} -> {}", a.wq, b.wq);
        prop_assert!(b.ws > a.ws, "Ws {} -> {}", a.ws, b.ws);
    }

    /// Adding a server never lengthens the queue
    #[test]
    fn test_more_servers_shorter_queue(
        mu in 0.1f64..100.0,
        servers in 1u32..=40,
        utilization in 0.01f64..0.95,
    ) {
        let lambda = servers as f64 * mu * utilization;
        let a = stable(lambda, mu, servers);
        let b = stable(lambda, mu, servers + 1);

        prop_assert!(b.lq <= a.lq + 1e-12);
        prop_assert!(b.p0 >= a.p0 - 1e-12);
    }

    /// Offered load at or above capacity is always unstable
    #[test]
    fn test_overload_is_unstable(
        mu in 0.1f64..100.0,
        servers in 1u32..=2_000,
        overload in 1.0001f64..10.0,
    ) {
        let lambda = servers as f64 * mu * overload;
        let outcome = compute_metrics(lambda, mu, servers).unwrap();

        prop_assert!(!outcome.is_stable());
        prop_assert!(outcome.rho() >= 1.0 - 1e-12);
        prop_assert!(outcome.into_metrics().is_err());
    }
}
