//! Backward traversal of the computational graph

use super::Tensor;
use ndarray::Array1;
use std::collections::HashSet;
use std::rc::Rc;

/// A recorded operation that can push its output gradient to its inputs
///
/// `backward` only propagates one level: it reads the gradient of its own
/// output and accumulates into its inputs. Ordering across the graph is the
/// job of [`backward`].
pub trait BackwardOp {
    /// Accumulate gradients into the inputs
    fn backward(&self);

    /// Inputs of this operation
    fn inputs(&self) -> Vec<&Tensor>;
}

fn op_key(op: &Rc<dyn BackwardOp>) -> *const () {
    Rc::as_ptr(op).cast()
}

/// Reverse topological order of every op reachable from `root`
fn topological_order(root: Rc<dyn BackwardOp>) -> Vec<Rc<dyn BackwardOp>> {
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    // (op, children_pushed)
    let mut stack: Vec<(Rc<dyn BackwardOp>, bool)> = vec![(root, false)];

    while let Some((op, expanded)) = stack.pop() {
        if expanded {
            order.push(op);
            continue;
        }
        if !visited.insert(op_key(&op)) {
            continue;
        }
        let children: Vec<Rc<dyn BackwardOp>> =
            op.inputs().iter().filter_map(|t| t.backward_op()).collect();
        stack.push((op, true));
        for child in children {
            if !visited.contains(&op_key(&child)) {
                stack.push((child, false));
            }
        }
    }

    order.reverse();
    order
}

/// Perform the backward pass from `tensor`
///
/// Seeds the output gradient with `grad_output`, or ones when `None`
/// (the usual case for a scalar loss). Each op runs exactly once, after
/// every op that consumes its output.
pub fn backward(tensor: &mut Tensor, grad_output: Option<Array1<f32>>) {
    match grad_output {
        Some(grad) => tensor.set_grad(grad),
        None => tensor.set_grad(Array1::ones(tensor.len())),
    }

    if let Some(root) = tensor.backward_op() {
        for op in topological_order(root) {
            op.backward();
        }
    }
}
