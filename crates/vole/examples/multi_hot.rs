// Multi-hot Lookup Example — one forward/backward round trip
//
// A tiny "recommendation" setup: 6 item categories, 3-dimensional
// embeddings, and a batch where one category appears twice so the
// duplicate-index accumulation is visible in the printed gradient.
//
// This example demonstrates:
//   1. Two-phase shape inference (defer, then resolve)
//   2. The forward gather through the Embedding layer
//   3. The backward scatter-add, with duplicate indices summing

use vole::prelude::*;

fn print_matrix(name: &str, data: &[f64], rows: usize, cols: usize) {
    println!("{} ({} x {}):", name, rows, cols);
    for r in 0..rows {
        let row: Vec<String> = data[r * cols..(r + 1) * cols]
            .iter()
            .map(|v| format!("{:6.2}", v))
            .collect();
        println!("  [{}]", row.join(", "));
    }
}

fn main() -> vole::Result<()> {
    let dev = CpuDevice;

    println!("=== Vole — Multi-hot Embedding Example ===");
    println!();

    // 1. Shape inference, the way a graph builder drives it.
    let op = MultiEmbedding::new(MultiEmbeddingConfig {
        input_dim: 6,
        output_dim: 3,
    })?;

    // First pass: the index-vector shape is not known yet — defer.
    assert!(op.infer_shapes(None, None)?.is_none());
    println!("pass 1: index shape unresolved, inference deferred");

    // Second pass: upstream settled on a batch of 4.
    let inferred = op.infer_shapes(Some(&Shape::from(4)), None)?.unwrap();
    println!(
        "pass 2: weight {} out {}",
        inferred.weight, inferred.out
    );
    println!();

    // 2. Forward through the layer (random N(0,1) table).
    let emb = vole::nn::Embedding::<CpuBackend, f64>::new(6, 3, &dev)?;
    let indices = [2u32, 5, 2, 0];
    println!("indices: {:?} (category 2 appears twice)", indices);

    let out = emb.forward(&indices)?;
    print_matrix("output", &out, indices.len(), 3);
    println!();

    // 3. Backward: pretend the loss gradient is all ones, so the gradient
    //    for category 2 is exactly 2.0 in every column.
    let grad_out = vec![1.0f64; indices.len() * 3];
    let grad_weight = emb.backward(&indices, &grad_out)?;
    print_matrix("weight gradient", &grad_weight, 6, 3);
    println!();
    println!("row 2 accumulated both of its positions; rows 1, 3, 4 stayed zero");

    Ok(())
}
