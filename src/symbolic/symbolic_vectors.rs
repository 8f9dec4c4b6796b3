use crate::symbolic::symbolic_engine::Expr;

use nalgebra::DMatrix;
use std::ops::{Index, Mul};
#[derive(Clone, Debug, PartialEq)]
/// Symbolic vector
pub struct ExprVector {
    pub data: Vec<Expr>,
}

impl ExprVector {
    /// Create new symbolic vector
    pub fn new(data: Vec<Expr>) -> Self {
        Self { data }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.data.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Expr> {
        self.data.get(index)
    }

    /// Dot product (symbolic)
    pub fn dot(&self, other: &ExprVector) -> Expr {
        assert_eq!(self.len(), other.len(), "Vector dimensions must match");
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(Expr::Const(0.0), |acc, (a, b)| acc + a.clone() * b.clone())
            .simplify_()
    }

    pub fn map<F>(&self, f: F) -> ExprVector
    where
        F: Fn(&Expr) -> Expr,
    {
        ExprVector {
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Simplify all expressions
    pub fn simplify(&self) -> ExprVector {
        self.map(|expr| expr.simplify_())
    }
}

impl Index<usize> for ExprVector {
    type Output = Expr;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl std::fmt::Display for ExprVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, expr) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", expr)?;
        }
        write!(f, "]")
    }
}

/// Dense symbolic matrix, row major
#[derive(Clone, Debug, PartialEq)]
pub struct ExprMatrix {
    pub data: Vec<Vec<Expr>>,
    pub nrows: usize,
    pub ncols: usize,
}

impl ExprMatrix {
    /// Create new symbolic matrix
    pub fn new(data: Vec<Vec<Expr>>) -> Self {
        let nrows = data.len();
        let ncols = if nrows > 0 { data[0].len() } else { 0 };

        for row in &data {
            assert_eq!(row.len(), ncols, "All rows must have the same length");
        }

        Self { data, nrows, ncols }
    }

    /// Create identity matrix
    pub fn identity(size: usize) -> Self {
        let data = (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| Expr::Const(if i == j { 1.0 } else { 0.0 }))
                    .collect()
            })
            .collect();
        Self {
            data,
            nrows: size,
            ncols: size,
        }
    }

    pub fn row(&self, i: usize) -> ExprVector {
        ExprVector::new(self.data[i].clone())
    }

    pub fn column(&self, j: usize) -> ExprVector {
        ExprVector::new(self.data.iter().map(|row| row[j].clone()).collect())
    }

    /// Transpose
    pub fn transpose(&self) -> ExprMatrix {
        let data = (0..self.ncols)
            .map(|j| self.data.iter().map(|row| row[j].clone()).collect())
            .collect();
        ExprMatrix {
            data,
            nrows: self.ncols,
            ncols: self.nrows,
        }
    }

    /// Matrix-vector multiplication
    pub fn mul_vector(&self, vec: &ExprVector) -> ExprVector {
        assert_eq!(
            self.ncols,
            vec.len(),
            "Matrix columns must match vector length"
        );
        ExprVector::new(
            (0..self.nrows)
                .map(|i| self.row(i).dot(vec))
                .collect(),
        )
    }

    /// Apply function to each element
    pub fn map<F>(&self, f: F) -> ExprMatrix
    where
        F: Fn(&Expr) -> Expr,
    {
        let new_data = self
            .data
            .iter()
            .map(|row| row.iter().map(&f).collect())
            .collect();
        ExprMatrix::new(new_data)
    }

    /// Simplify all expressions
    pub fn simplify(&self) -> ExprMatrix {
        self.map(|expr| expr.simplify_())
    }

    /// Evaluate matrix numerically
    pub fn evaluate(&self, vars: &[&str], values: &[f64]) -> DMatrix<f64> {
        DMatrix::from_fn(self.nrows, self.ncols, |i, j| {
            self.data[i][j].eval_expression(vars.to_vec(), values)
        })
    }
}

impl Index<(usize, usize)> for ExprMatrix {
    type Output = Expr;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i][j]
    }
}

// Matrix multiplication
impl Mul for ExprMatrix {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        assert_eq!(
            self.ncols, other.nrows,
            "Matrix dimensions incompatible for multiplication"
        );
        let data = (0..self.nrows)
            .map(|i| {
                let row = self.row(i);
                (0..other.ncols).map(|j| row.dot(&other.column(j))).collect()
            })
            .collect();
        ExprMatrix::new(data)
    }
}

impl std::fmt::Display for ExprMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ExprMatrix {}x{} [", self.nrows, self.ncols)?;
        for row in &self.data {
            write!(f, "  [")?;
            for (j, expr) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", expr)?;
            }
            writeln!(f, "]")?;
        }
        write!(f, "]")
    }
}
