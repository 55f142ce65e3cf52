//! Closed-form M/M/s steady-state formulas

use crate::error::QueueResult;
use crate::types::{validate_positive, validate_servers, Instability, Metrics, Outcome};

/// `ln(r^n / n!)` below the largest term by more than this contributes
/// nothing representable in `f64`
const NEGLIGIBLE_LN: f64 = -750.0;

/// `n!` accumulated as a floating-point product
pub fn factorial(n: u32) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * f64::from(i))
}

/// Traffic intensity lambda / (s * mu)
pub fn traffic_intensity(lambda: f64, mu: f64, servers: u32) -> f64 {
    lambda / (f64::from(servers) * mu)
}

/// Evaluate the M/M/s model for per-second rates `lambda` and `mu`.
///
/// Returns `Outcome::Unstable` when rho >= 1; no metrics exist then.
pub fn compute_metrics(lambda: f64, mu: f64, servers: u32) -> QueueResult<Outcome> {
    validate_positive("lambda", lambda)?;
    validate_positive("mu", mu)?;
    validate_servers(servers)?;

    let rho = traffic_intensity(lambda, mu, servers);
    if rho >= 1.0 {
        return Ok(Outcome::Unstable(Instability {
            lambda,
            mu,
            servers,
            rho,
        }));
    }

    let metrics = if servers == 1 {
        single_server(lambda, mu, rho)
    } else {
        multi_server(lambda, mu, servers, rho)
    };

    Ok(Outcome::Stable(metrics))
}

fn single_server(lambda: f64, mu: f64, rho: f64) -> Metrics {
    let p0 = 1.0 - rho;
    let lq = rho.powi(2) / (1.0 - rho);
    let ls = rho / (1.0 - rho);
    let wq = lq / lambda;
    let ws = 1.0 / (mu - lambda);

    Metrics {
        lambda,
        mu,
        servers: 1,
        rho,
        p0,
        lq,
        ls,
        wq,
        ws,
    }
}

// Erlang-C forms evaluated in log space. ln(r^n / n!) is accumulated as a
// sum of ln(r / n) and the series is normalized by its largest term, so no
// server count or offered load overflows r^s or s!.
fn multi_server(lambda: f64, mu: f64, servers: u32, rho: f64) -> Metrics {
    let r = lambda / mu;
    let ln_r = r.ln();

    // running log-sum-exp of ln(r^n / n!) over n < s
    let mut ln_term = 0.0;
    let mut peak = 0.0;
    let mut head = 0.0;
    let mut truncated = false;
    for n in 0..servers {
        if n > 0 {
            ln_term += ln_r - f64::from(n).ln();
        }
        if ln_term > peak {
            head *= (peak - ln_term).exp();
            peak = ln_term;
        }
        head += (ln_term - peak).exp();

        // past the mode the terms only shrink
        if f64::from(n) > r && ln_term - peak < NEGLIGIBLE_LN {
            truncated = true;
            break;
        }
    }

    // ln(r^s / s!); never above peak since r < s when stable
    let ln_term_s = if truncated {
        f64::NEG_INFINITY
    } else {
        ln_term + ln_r - f64::from(servers).ln()
    };

    let last_term = (ln_term_s - peak).exp() / (1.0 - rho);
    let ln_norm = peak + (head + last_term).ln();
    let p0 = (-ln_norm).exp();
    // P0 * r^s / s!
    let waiting = (ln_term_s - ln_norm).exp();

    let lq = (waiting * rho) / (1.0 - rho).powi(2);
    let ls = lq + r;
    let wq = lq / lambda;
    let ws = wq + 1.0 / mu;

    Metrics {
        lambda,
        mu,
        servers,
        rho,
        p0,
        lq,
        ls,
        wq,
        ws,
    }
}
