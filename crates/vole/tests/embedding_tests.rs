// Integration tests for the multi-hot embedding lookup
//
// These tests exercise the full stack — operator validation, shape
// inference, and the CPU kernels — through the facade crate, the way a
// host graph executor would drive it.

use vole::prelude::*;

fn assert_vec_approx(got: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(
        got.len(),
        expected.len(),
        "length mismatch: {} vs {}",
        got.len(),
        expected.len()
    );
    for (i, (g, e)) in got.iter().zip(expected.iter()).enumerate() {
        assert!(
            (g - e).abs() < tol,
            "index {}: got {} expected {} (tol {})",
            i,
            g,
            e,
            tol
        );
    }
}

fn op(input_dim: usize, output_dim: usize) -> MultiEmbedding {
    MultiEmbedding::new(MultiEmbeddingConfig {
        input_dim,
        output_dim,
    })
    .unwrap()
}

// Shape inference — the two-phase protocol

#[test]
fn test_inference_then_retry() -> Result<()> {
    let op = op(100, 16);

    // First pass: index-vector shape not settled yet. Defer.
    assert!(op.infer_shapes(None, None)?.is_none());

    // Second pass: upstream resolved to a batch of 32.
    let inferred = op.infer_shapes(Some(&Shape::from(32)), None)?.unwrap();
    assert_eq!(inferred.weight, Shape::from((100, 16)));
    assert_eq!(inferred.out, Shape::from((32, 16)));

    // Third pass with the weight shape already fixed: consistent, same answer.
    let again = op
        .infer_shapes(Some(&Shape::from(32)), Some(&inferred.weight))?
        .unwrap();
    assert_eq!(again, inferred);
    Ok(())
}

#[test]
fn test_inference_conflicting_weight_fails() {
    let op = op(100, 16);
    let err = op
        .infer_shapes(Some(&Shape::from(32)), Some(&Shape::from((100, 8))))
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

// Forward — gather correctness

#[test]
fn test_forward_example() -> Result<()> {
    // weight = [[1,1],[2,2],[3,3]], index = [1,0,1] → [[2,2],[1,1],[2,2]]
    let op = op(3, 2);
    let weight = [1.0f64, 1.0, 2.0, 2.0, 3.0, 3.0];
    let indices = [1u32, 0, 1];
    let mut out = [0.0f64; 6];
    op.forward::<CpuBackend, f64>(
        &CpuDevice,
        OpReq::Write,
        &indices,
        MatRef::new(&weight, 3, 2)?,
        MatMut::new(&mut out, 3, 2)?,
    )?;
    assert_vec_approx(&out, &[2.0, 2.0, 1.0, 1.0, 2.0, 2.0], 1e-12);
    Ok(())
}

#[test]
fn test_forward_gathers_every_row_fully() -> Result<()> {
    let op = op(7, 3);
    let weight: Vec<f64> = (0..21).map(|v| v as f64).collect();
    let indices = [6u32, 0, 3, 3, 2];
    let mut out = vec![0.0f64; indices.len() * 3];
    op.forward::<CpuBackend, f64>(
        &CpuDevice,
        OpReq::Write,
        &indices,
        MatRef::new(&weight, 7, 3)?,
        MatMut::new(&mut out, indices.len(), 3)?,
    )?;
    for (k, &i) in indices.iter().enumerate() {
        let row = &out[k * 3..(k + 1) * 3];
        let expected = &weight[i as usize * 3..(i as usize + 1) * 3];
        assert_vec_approx(row, expected, 1e-12);
    }
    Ok(())
}

#[test]
fn test_forward_is_idempotent() -> Result<()> {
    let op = op(4, 2);
    let weight = [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    let indices = [3u32, 1, 1, 0];

    let mut first = vec![0.0f64; 8];
    op.forward::<CpuBackend, f64>(
        &CpuDevice,
        OpReq::Write,
        &indices,
        MatRef::new(&weight, 4, 2)?,
        MatMut::new(&mut first, 4, 2)?,
    )?;

    // Second call over a dirty buffer: same inputs, same output.
    let mut second = vec![9.9f64; 8];
    op.forward::<CpuBackend, f64>(
        &CpuDevice,
        OpReq::Write,
        &indices,
        MatRef::new(&weight, 4, 2)?,
        MatMut::new(&mut second, 4, 2)?,
    )?;
    assert_vec_approx(&second, &first, 1e-15);
    Ok(())
}

#[test]
fn test_forward_empty_batch() -> Result<()> {
    let op = op(3, 2);
    let weight = [0.0f64; 6];
    let mut out: [f64; 0] = [];
    op.forward::<CpuBackend, f64>(
        &CpuDevice,
        OpReq::Write,
        &[],
        MatRef::new(&weight, 3, 2)?,
        MatMut::new(&mut out, 0, 2)?,
    )?;
    Ok(())
}

// Backward — scatter-add correctness

#[test]
fn test_duplicate_index_accumulation() -> Result<()> {
    // input_dim=5, output_dim=2, index [2,0,2], grad [[1,1],[2,2],[3,3]]
    // → row 2 = [4,4], row 0 = [2,2], all other rows [0,0].
    let op = op(5, 2);
    let indices = [2u32, 0, 2];
    let grad_out = [1.0f64, 1.0, 2.0, 2.0, 3.0, 3.0];
    let mut grad_weight = [0.0f64; 10];
    op.backward::<CpuBackend, f64>(
        &CpuDevice,
        &indices,
        MatRef::new(&grad_out, 3, 2)?,
        OpReq::Null,
        OpReq::Write,
        MatMut::new(&mut grad_weight, 5, 2)?,
    )?;
    assert_vec_approx(
        &grad_weight,
        &[2.0, 2.0, 0.0, 0.0, 4.0, 4.0, 0.0, 0.0, 0.0, 0.0],
        1e-12,
    );
    Ok(())
}

#[test]
fn test_scatter_add_matches_reference_sum() -> Result<()> {
    let op = op(6, 3);
    let indices = [5u32, 1, 5, 1, 1, 0];
    let grad_out: Vec<f64> = (0..18).map(|v| v as f64 * 0.5).collect();
    let mut grad_weight = vec![0.0f64; 18];
    op.backward::<CpuBackend, f64>(
        &CpuDevice,
        &indices,
        MatRef::new(&grad_out, 6, 3)?,
        OpReq::Null,
        OpReq::Write,
        MatMut::new(&mut grad_weight, 6, 3)?,
    )?;

    // Reference: per-row sum over all positions carrying that index;
    // rows with no matching index must be exactly zero.
    let mut expected = vec![0.0f64; 18];
    for (k, &i) in indices.iter().enumerate() {
        for c in 0..3 {
            expected[i as usize * 3 + c] += grad_out[k * 3 + c];
        }
    }
    assert_vec_approx(&grad_weight, &expected, 1e-12);
    Ok(())
}

#[test]
fn test_backward_write_zeroes_stale_buffer() -> Result<()> {
    let op = op(3, 2);
    let indices = [0u32];
    let grad_out = [1.0f64, 1.0];
    // Stale content everywhere: Write mode must clear it, including rows
    // no index touches.
    let mut grad_weight = [7.0f64; 6];
    op.backward::<CpuBackend, f64>(
        &CpuDevice,
        &indices,
        MatRef::new(&grad_out, 1, 2)?,
        OpReq::Null,
        OpReq::Write,
        MatMut::new(&mut grad_weight, 3, 2)?,
    )?;
    assert_vec_approx(&grad_weight, &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0], 1e-12);
    Ok(())
}

#[test]
fn test_backward_add_accumulates_across_calls() -> Result<()> {
    let op = op(3, 2);
    let grad_out = [1.0f64, 2.0];
    let mut grad_weight = [0.0f64; 6];
    for _ in 0..2 {
        op.backward::<CpuBackend, f64>(
            &CpuDevice,
            &[1],
            MatRef::new(&grad_out, 1, 2)?,
            OpReq::Null,
            OpReq::Add,
            MatMut::new(&mut grad_weight, 3, 2)?,
        )?;
    }
    assert_vec_approx(&grad_weight, &[0.0, 0.0, 2.0, 4.0, 0.0, 0.0], 1e-12);
    Ok(())
}

#[test]
fn test_backward_empty_batch_zeroes_in_write_mode() -> Result<()> {
    let op = op(2, 2);
    let grad_out: [f64; 0] = [];
    let mut grad_weight = [3.0f64; 4];
    op.backward::<CpuBackend, f64>(
        &CpuDevice,
        &[],
        MatRef::new(&grad_out, 0, 2)?,
        OpReq::Null,
        OpReq::Write,
        MatMut::new(&mut grad_weight, 2, 2)?,
    )?;
    assert_vec_approx(&grad_weight, &[0.0; 4], 1e-12);
    Ok(())
}

// Rejection properties

#[test]
fn test_zero_input_dim_rejected() {
    let err = MultiEmbedding::new(MultiEmbeddingConfig {
        input_dim: 0,
        output_dim: 2,
    })
    .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_index_gradient_rejected() -> Result<()> {
    let op = op(3, 2);
    let grad_out = [1.0f64, 1.0];
    let mut grad_weight = [0.0f64; 6];
    let err = op
        .backward::<CpuBackend, f64>(
            &CpuDevice,
            &[0],
            MatRef::new(&grad_out, 1, 2)?,
            OpReq::Add,
            OpReq::Write,
            MatMut::new(&mut grad_weight, 3, 2)?,
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedGradient { .. }));
    Ok(())
}

#[test]
fn test_non_overwrite_forward_rejected() -> Result<()> {
    let op = op(3, 2);
    let weight = [0.0f64; 6];
    let mut out = [0.0f64; 2];
    let err = op
        .forward::<CpuBackend, f64>(
            &CpuDevice,
            OpReq::Add,
            &[0],
            MatRef::new(&weight, 3, 2)?,
            MatMut::new(&mut out, 1, 2)?,
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedWriteMode { .. }));
    Ok(())
}

#[test]
fn test_out_of_bounds_index_rejected() -> Result<()> {
    let op = op(3, 2);
    let weight = [0.0f64; 6];
    let mut out = [0.0f64; 2];
    let err = op
        .forward::<CpuBackend, f64>(
            &CpuDevice,
            OpReq::Write,
            &[3],
            MatRef::new(&weight, 3, 2)?,
            MatMut::new(&mut out, 1, 2)?,
        )
        .unwrap_err();
    assert!(matches!(err, Error::IndexOutOfBounds { index: 3, .. }));
    Ok(())
}

// Operand and dependency contracts

#[test]
fn test_operand_naming_contract() {
    assert_eq!(operand::ARGUMENTS, ["data", "weight"]);
    assert_eq!(operand::OUTPUTS, ["out"]);
}

#[test]
fn test_backward_needs_only_grad_and_indices() {
    let op = op(3, 2);
    // Host tensor ids: out_grad=[7], in_data=[1 (data), 2 (weight)], out_data=[5].
    let deps = op.backward_dependencies(&[7], &[1, 2], &[5]);
    // Neither the weight (2) nor the forward output (5) is retained.
    assert_eq!(deps, [7, 1]);
}

// Layer round trip and other dtypes

#[test]
fn test_embedding_layer_round_trip() -> Result<()> {
    use vole::nn::Embedding;

    let weight = vec![1.0f32, 1.0, 2.0, 2.0, 3.0, 3.0];
    let emb = Embedding::<CpuBackend, f32>::from_weight(weight, 3, 2, &CpuDevice)?;

    let out = emb.forward(&[1, 0, 1])?;
    assert_eq!(out, vec![2.0, 2.0, 1.0, 1.0, 2.0, 2.0]);

    let grad = emb.backward(&[1, 0, 1], &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0])?;
    assert_eq!(grad, vec![2.0, 2.0, 4.0, 4.0, 0.0, 0.0]);
    Ok(())
}

#[test]
fn test_forward_backward_bf16() -> Result<()> {
    use half::bf16;

    let op = op(2, 2);
    let weight: Vec<bf16> = [1.0, 2.0, 3.0, 4.0].iter().map(|&v| bf16::from_f64(v)).collect();
    let indices = [1u32, 1];
    let mut out = vec![bf16::from_f64(0.0); 4];
    op.forward::<CpuBackend, bf16>(
        &CpuDevice,
        OpReq::Write,
        &indices,
        MatRef::new(&weight, 2, 2)?,
        MatMut::new(&mut out, 2, 2)?,
    )?;
    assert_eq!(out[0].to_f64(), 3.0);
    assert_eq!(out[3].to_f64(), 4.0);

    let mut grad_weight = vec![bf16::from_f64(0.0); 4];
    op.backward::<CpuBackend, bf16>(
        &CpuDevice,
        &indices,
        MatRef::new(&out, 2, 2)?,
        OpReq::Null,
        OpReq::Write,
        MatMut::new(&mut grad_weight, 2, 2)?,
    )?;
    // Both positions hit row 1: 3+3 and 4+4.
    assert_eq!(grad_weight[2].to_f64(), 6.0);
    assert_eq!(grad_weight[3].to_f64(), 8.0);
    assert_eq!(grad_weight[0].to_f64(), 0.0);
    Ok(())
}
