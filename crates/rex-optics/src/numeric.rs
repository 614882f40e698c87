use rex_core::errors::{ensure_finite, ErrorInfo, RexError};

/// Least-squares straight line through the samples, returned highest degree
/// first as `[slope, intercept]`.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Result<[f64; 2], RexError> {
    if xs.len() != ys.len() {
        return Err(RexError::InvalidInput(
            ErrorInfo::new("fit-length-mismatch", "abscissae and ordinates differ in length")
                .with_context("xs", xs.len())
                .with_context("ys", ys.len()),
        ));
    }
    ensure_finite("xs", xs)?;
    ensure_finite("ys", ys)?;
    if xs.len() < 2 {
        return Err(RexError::InvalidInput(
            ErrorInfo::new("fit-underdetermined", "a line needs at least two samples")
                .with_context("samples", xs.len()),
        ));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (sxx, sxy) = xs
        .iter()
        .zip(ys.iter())
        .fold((0.0, 0.0), |(sxx, sxy), (&x, &y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
    if sxx == 0.0 {
        return Err(RexError::InvalidInput(
            ErrorInfo::new("fit-degenerate", "all samples share the same abscissa")
                .with_context("x", mean_x),
        ));
    }
    let slope = sxy / sxx;
    Ok([slope, mean_y - slope * mean_x])
}

/// Evaluates a polynomial given highest degree first (Horner scheme).
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Index of the sample closest to `target`; the first one wins ties.
pub fn argmin_distance(values: &[f64], target: f64) -> Option<usize> {
    argmin_distance_where(values, target, |_| true)
}

/// Index of the sample closest to `target` among those accepted by `keep`;
/// the first one wins ties.
pub fn argmin_distance_where(
    values: &[f64],
    target: f64,
    mut keep: impl FnMut(usize) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if !keep(idx) {
            continue;
        }
        let distance = (value - target).abs();
        match best {
            Some((_, current)) if distance >= current => {}
            _ => best = Some((idx, distance)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Index of the largest value among those accepted by `keep`; the first one wins ties.
pub fn argmax_where(values: &[f64], mut keep: impl FnMut(usize) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if !keep(idx) {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}
