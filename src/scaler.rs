use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Per-column standardization: `(x - mean) / std`.
///
/// Uses the population standard deviation. Constant columns get a scale of
/// 1 so they come out as all zeros instead of NaN. Means are accumulated
/// incrementally, so columns of huge but finite values (near `f64::MAX`)
/// do not overflow. Columns whose spread itself exceeds `f64::MAX` still
/// scale to non-finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    pub scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: ArrayView2<f64>) -> Self {
        let n_features = x.ncols();
        if x.nrows() == 0 {
            return Self {
                mean: Array1::zeros(n_features),
                scale: Array1::ones(n_features),
            };
        }

        let mut mean = Array1::<f64>::zeros(n_features);
        for (i, row) in x.outer_iter().enumerate() {
            let count = (i + 1) as f64;
            mean.zip_mut_with(&row, |m, &v| *m += (v - *m) / count);
        }
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s });
        Self { mean, scale }
    }

    pub fn transform(&self, x: ArrayView2<f64>) -> Array2<f64> {
        (&x - &self.mean) / &self.scale
    }

    pub fn fit_transform(x: ArrayView2<f64>) -> (Self, Array2<f64>) {
        let scaler = Self::fit(x);
        let scaled = scaler.transform(x);
        (scaler, scaled)
    }
}
