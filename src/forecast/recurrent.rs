//! Sequential forecaster: a two-layer recurrent regressor over scaled
//! lookback windows.
//!
//! Two stacked Elman-style tanh layers (default hidden sizes 64 and 32) with
//! inverted dropout between them during training, and a linear scalar head on
//! the final hidden state. Trained with minibatch Adam on mean squared error,
//! entirely in scaled space; callers inverse-transform predictions with the
//! window builder's scale params. The trained state is an explicit value, so
//! retraining versus reusing a previous fit is always the caller's choice.

use crate::config::RecurrentParams;
use crate::error::ForecastError;
use crate::forecast::window::Window;
use rand::seq::SliceRandom;
use rand::Rng;

const GRAD_CLIP_NORM: f64 = 5.0;
const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;

/// One recurrent layer: h_t = tanh(Wx x_t + Wh h_{t-1} + b).
///
/// Weight matrices are stored row-major flat: `wx` is hidden x input,
/// `wh` is hidden x hidden.
#[derive(Debug, Clone)]
struct RecurrentLayer {
    input_size: usize,
    hidden_size: usize,
    wx: Vec<f64>,
    wh: Vec<f64>,
    b: Vec<f64>,
}

impl RecurrentLayer {
    fn new<R: Rng>(input_size: usize, hidden_size: usize, rng: &mut R) -> Self {
        let limit = (1.0 / hidden_size as f64).sqrt();
        let mut init = |n: usize| -> Vec<f64> {
            (0..n).map(|_| rng.gen_range(-limit..limit)).collect()
        };
        let wx = init(hidden_size * input_size);
        let wh = init(hidden_size * hidden_size);
        Self {
            input_size,
            hidden_size,
            wx,
            wh,
            b: vec![0.0; hidden_size],
        }
    }

    fn step(&self, x: &[f64], h_prev: &[f64]) -> Vec<f64> {
        let mut h = self.b.clone();
        for r in 0..self.hidden_size {
            let mut sum = h[r];
            for c in 0..self.input_size {
                sum += self.wx[r * self.input_size + c] * x[c];
            }
            for c in 0..self.hidden_size {
                sum += self.wh[r * self.hidden_size + c] * h_prev[c];
            }
            h[r] = sum.tanh();
        }
        h
    }
}

/// Gradient buffers matching one layer's shapes.
#[derive(Debug, Clone)]
struct LayerGrads {
    wx: Vec<f64>,
    wh: Vec<f64>,
    b: Vec<f64>,
}

impl LayerGrads {
    fn zeros(layer: &RecurrentLayer) -> Self {
        Self {
            wx: vec![0.0; layer.wx.len()],
            wh: vec![0.0; layer.wh.len()],
            b: vec![0.0; layer.b.len()],
        }
    }
}

/// Trained state of the sequential forecaster.
#[derive(Debug, Clone)]
pub struct TrainedRecurrent {
    layer1: RecurrentLayer,
    layer2: RecurrentLayer,
    wo: Vec<f64>,
    bo: f64,
}

impl TrainedRecurrent {
    /// Run one window through the network without dropout.
    fn forward(&self, inputs: &[f64]) -> f64 {
        let mut h1 = vec![0.0; self.layer1.hidden_size];
        let mut h2 = vec![0.0; self.layer2.hidden_size];
        for &x in inputs {
            h1 = self.layer1.step(&[x], &h1);
            h2 = self.layer2.step(&h1, &h2);
        }
        dot(&self.wo, &h2) + self.bo
    }

    /// Predict the scaled next value for each window.
    pub fn predict(&self, windows: &[Window]) -> Vec<f64> {
        windows.iter().map(|w| self.forward(&w.inputs)).collect()
    }
}

/// Per-sample forward pass that keeps the state needed for backprop.
struct ForwardTrace {
    h1s: Vec<Vec<f64>>,
    h2s: Vec<Vec<f64>>,
    /// Layer-1 hidden states after the dropout mask, as fed to layer 2.
    dropped1: Vec<Vec<f64>>,
    /// Inverted-dropout multipliers (0 or 1/(1-p)) per timestep.
    masks: Vec<Vec<f64>>,
    output: f64,
}

/// Train the sequential forecaster on scaled windows.
///
/// Minibatch Adam over `epochs` passes with per-epoch shuffling and global
/// gradient-norm clipping. Numeric divergence (non-finite loss) is reported
/// as a training failure rather than producing a garbage model.
pub fn train(
    windows: &[Window],
    params: &RecurrentParams,
) -> Result<TrainedRecurrent, ForecastError> {
    if windows.is_empty() {
        return Err(ForecastError::InvalidInput(
            "no training windows".to_string(),
        ));
    }
    let seq_len = windows[0].inputs.len();
    if seq_len == 0 || windows.iter().any(|w| w.inputs.len() != seq_len) {
        return Err(ForecastError::InvalidInput(
            "training windows must share a non-zero length".to_string(),
        ));
    }
    if !(0.0..1.0).contains(&params.dropout) {
        return Err(ForecastError::InvalidInput(format!(
            "dropout must be in [0, 1), got {}",
            params.dropout
        )));
    }

    let [n1, n2] = params.hidden_sizes;
    if n1 == 0 || n2 == 0 {
        return Err(ForecastError::InvalidInput(format!(
            "hidden layer sizes must be non-zero, got [{}, {}]",
            n1, n2
        )));
    }
    let mut rng = rand::thread_rng();
    let mut model = TrainedRecurrent {
        layer1: RecurrentLayer::new(1, n1, &mut rng),
        layer2: RecurrentLayer::new(n1, n2, &mut rng),
        wo: (0..n2)
            .map(|_| rng.gen_range(-1.0 / (n2 as f64).sqrt()..1.0 / (n2 as f64).sqrt()))
            .collect(),
        bo: 0.0,
    };
    let mut opt = Adam::new(&model, params.learning_rate);

    let batch_size = params.batch_size.max(1).min(windows.len());
    let mut order: Vec<usize> = (0..windows.len()).collect();

    for _epoch in 0..params.epochs {
        order.shuffle(&mut rng);

        for batch in order.chunks(batch_size) {
            let mut g1 = LayerGrads::zeros(&model.layer1);
            let mut g2 = LayerGrads::zeros(&model.layer2);
            let mut gwo = vec![0.0; model.wo.len()];
            let mut gbo = 0.0;
            let mut batch_loss = 0.0;

            for &idx in batch {
                let window = &windows[idx];
                let trace = forward_train(&model, &window.inputs, params.dropout, &mut rng);
                let err = trace.output - window.target;
                batch_loss += err * err;
                backward(
                    &model, &trace, &window.inputs, 2.0 * err, &mut g1, &mut g2, &mut gwo,
                    &mut gbo,
                );
            }

            if !batch_loss.is_finite() {
                return Err(ForecastError::Training(
                    "loss diverged to a non-finite value".to_string(),
                ));
            }

            let inv = 1.0 / batch.len() as f64;
            scale_grads(&mut g1, &mut g2, &mut gwo, &mut gbo, inv);
            clip_grads(&mut g1, &mut g2, &mut gwo, &mut gbo, GRAD_CLIP_NORM);
            opt.step(&mut model, &g1, &g2, &gwo, gbo);
        }
    }

    Ok(model)
}

fn forward_train<R: Rng>(
    model: &TrainedRecurrent,
    inputs: &[f64],
    dropout: f64,
    rng: &mut R,
) -> ForwardTrace {
    let n1 = model.layer1.hidden_size;
    let keep = 1.0 - dropout;
    let seq_len = inputs.len();

    let mut h1s = Vec::with_capacity(seq_len);
    let mut h2s = Vec::with_capacity(seq_len);
    let mut dropped1 = Vec::with_capacity(seq_len);
    let mut masks = Vec::with_capacity(seq_len);

    let mut h1 = vec![0.0; n1];
    let mut h2 = vec![0.0; model.layer2.hidden_size];
    for &x in inputs {
        h1 = model.layer1.step(&[x], &h1);
        let mask: Vec<f64> = (0..n1)
            .map(|_| {
                if dropout > 0.0 && rng.gen::<f64>() < dropout {
                    0.0
                } else {
                    1.0 / keep
                }
            })
            .collect();
        let dropped: Vec<f64> = h1.iter().zip(mask.iter()).map(|(h, m)| h * m).collect();
        h2 = model.layer2.step(&dropped, &h2);

        h1s.push(h1.clone());
        h2s.push(h2.clone());
        dropped1.push(dropped);
        masks.push(mask);
    }

    let output = dot(&model.wo, &h2) + model.bo;
    ForwardTrace {
        h1s,
        h2s,
        dropped1,
        masks,
        output,
    }
}

/// Backpropagation through time for one sample, accumulating into the batch
/// gradient buffers. `dy` is dLoss/dOutput.
#[allow(clippy::too_many_arguments)]
fn backward(
    model: &TrainedRecurrent,
    trace: &ForwardTrace,
    inputs: &[f64],
    dy: f64,
    g1: &mut LayerGrads,
    g2: &mut LayerGrads,
    gwo: &mut [f64],
    gbo: &mut f64,
) {
    let n1 = model.layer1.hidden_size;
    let n2 = model.layer2.hidden_size;
    let seq_len = inputs.len();

    let last = &trace.h2s[seq_len - 1];
    for j in 0..n2 {
        gwo[j] += dy * last[j];
    }
    *gbo += dy;

    // Carried hidden-state gradients.
    let mut dh2: Vec<f64> = model.wo.iter().map(|w| w * dy).collect();
    let mut dh1 = vec![0.0; n1];

    for t in (0..seq_len).rev() {
        // Layer 2: through tanh, then weights.
        let h2_t = &trace.h2s[t];
        let dz2: Vec<f64> = dh2
            .iter()
            .zip(h2_t.iter())
            .map(|(d, h)| d * (1.0 - h * h))
            .collect();
        let zeros2;
        let h2_prev: &[f64] = if t > 0 {
            &trace.h2s[t - 1]
        } else {
            zeros2 = vec![0.0; n2];
            &zeros2
        };
        for r in 0..n2 {
            for c in 0..n1 {
                g2.wx[r * n1 + c] += dz2[r] * trace.dropped1[t][c];
            }
            for c in 0..n2 {
                g2.wh[r * n2 + c] += dz2[r] * h2_prev[c];
            }
            g2.b[r] += dz2[r];
        }

        // Into layer 1's hidden state, back through the dropout mask.
        for c in 0..n1 {
            let mut sum = 0.0;
            for r in 0..n2 {
                sum += model.layer2.wx[r * n1 + c] * dz2[r];
            }
            dh1[c] += sum * trace.masks[t][c];
        }
        // Carry layer-2 recurrence.
        let mut dh2_prev = vec![0.0; n2];
        for c in 0..n2 {
            let mut sum = 0.0;
            for r in 0..n2 {
                sum += model.layer2.wh[r * n2 + c] * dz2[r];
            }
            dh2_prev[c] = sum;
        }
        dh2 = dh2_prev;

        // Layer 1.
        let h1_t = &trace.h1s[t];
        let dz1: Vec<f64> = dh1
            .iter()
            .zip(h1_t.iter())
            .map(|(d, h)| d * (1.0 - h * h))
            .collect();
        let zeros1;
        let h1_prev: &[f64] = if t > 0 {
            &trace.h1s[t - 1]
        } else {
            zeros1 = vec![0.0; n1];
            &zeros1
        };
        for r in 0..n1 {
            g1.wx[r] += dz1[r] * inputs[t];
            for c in 0..n1 {
                g1.wh[r * n1 + c] += dz1[r] * h1_prev[c];
            }
            g1.b[r] += dz1[r];
        }
        // Carry layer-1 recurrence.
        let mut dh1_prev = vec![0.0; n1];
        for c in 0..n1 {
            let mut sum = 0.0;
            for r in 0..n1 {
                sum += model.layer1.wh[r * n1 + c] * dz1[r];
            }
            dh1_prev[c] = sum;
        }
        dh1 = dh1_prev;
    }
}

fn scale_grads(g1: &mut LayerGrads, g2: &mut LayerGrads, gwo: &mut [f64], gbo: &mut f64, k: f64) {
    for g in grad_slices(g1, g2, gwo) {
        for v in g {
            *v *= k;
        }
    }
    *gbo *= k;
}

fn clip_grads(
    g1: &mut LayerGrads,
    g2: &mut LayerGrads,
    gwo: &mut [f64],
    gbo: &mut f64,
    max_norm: f64,
) {
    let mut sq = *gbo * *gbo;
    for g in grad_slices(g1, g2, gwo) {
        for v in g.iter() {
            sq += v * v;
        }
    }
    let norm = sq.sqrt();
    if norm > max_norm {
        let k = max_norm / norm;
        for g in grad_slices(g1, g2, gwo) {
            for v in g {
                *v *= k;
            }
        }
        *gbo *= k;
    }
}

fn grad_slices<'a>(
    g1: &'a mut LayerGrads,
    g2: &'a mut LayerGrads,
    gwo: &'a mut [f64],
) -> [&'a mut [f64]; 7] {
    [
        g1.wx.as_mut_slice(),
        g1.wh.as_mut_slice(),
        g1.b.as_mut_slice(),
        g2.wx.as_mut_slice(),
        g2.wh.as_mut_slice(),
        g2.b.as_mut_slice(),
        gwo,
    ]
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Adam optimizer state, one moment pair per parameter tensor.
struct Adam {
    lr: f64,
    t: u32,
    m1: LayerGrads,
    v1: LayerGrads,
    m2: LayerGrads,
    v2: LayerGrads,
    mwo: Vec<f64>,
    vwo: Vec<f64>,
    mbo: f64,
    vbo: f64,
}

impl Adam {
    fn new(model: &TrainedRecurrent, lr: f64) -> Self {
        Self {
            lr,
            t: 0,
            m1: LayerGrads::zeros(&model.layer1),
            v1: LayerGrads::zeros(&model.layer1),
            m2: LayerGrads::zeros(&model.layer2),
            v2: LayerGrads::zeros(&model.layer2),
            mwo: vec![0.0; model.wo.len()],
            vwo: vec![0.0; model.wo.len()],
            mbo: 0.0,
            vbo: 0.0,
        }
    }

    fn step(
        &mut self,
        model: &mut TrainedRecurrent,
        g1: &LayerGrads,
        g2: &LayerGrads,
        gwo: &[f64],
        gbo: f64,
    ) {
        self.t += 1;
        let bc1 = 1.0 - ADAM_BETA1.powi(self.t as i32);
        let bc2 = 1.0 - ADAM_BETA2.powi(self.t as i32);
        let lr = self.lr;

        let update = |p: &mut [f64], g: &[f64], m: &mut [f64], v: &mut [f64]| {
            for i in 0..p.len() {
                m[i] = ADAM_BETA1 * m[i] + (1.0 - ADAM_BETA1) * g[i];
                v[i] = ADAM_BETA2 * v[i] + (1.0 - ADAM_BETA2) * g[i] * g[i];
                let m_hat = m[i] / bc1;
                let v_hat = v[i] / bc2;
                p[i] -= lr * m_hat / (v_hat.sqrt() + ADAM_EPS);
            }
        };

        update(&mut model.layer1.wx, &g1.wx, &mut self.m1.wx, &mut self.v1.wx);
        update(&mut model.layer1.wh, &g1.wh, &mut self.m1.wh, &mut self.v1.wh);
        update(&mut model.layer1.b, &g1.b, &mut self.m1.b, &mut self.v1.b);
        update(&mut model.layer2.wx, &g2.wx, &mut self.m2.wx, &mut self.v2.wx);
        update(&mut model.layer2.wh, &g2.wh, &mut self.m2.wh, &mut self.v2.wh);
        update(&mut model.layer2.b, &g2.b, &mut self.m2.b, &mut self.v2.b);
        update(&mut model.wo, gwo, &mut self.mwo, &mut self.vwo);

        self.mbo = ADAM_BETA1 * self.mbo + (1.0 - ADAM_BETA1) * gbo;
        self.vbo = ADAM_BETA2 * self.vbo + (1.0 - ADAM_BETA2) * gbo * gbo;
        model.bo -= lr * (self.mbo / bc1) / ((self.vbo / bc2).sqrt() + ADAM_EPS);
    }
}
