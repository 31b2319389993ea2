//! Operator overloads on `&Matrix`.
//!
//! Matrix-matrix operators can fail on shapes and return `Result<Matrix>`.
//! Operators with a plain `f64` side always succeed, except division, which
//! rejects a zero divisor.

use crate::error::Result;
use crate::matrix::base::Matrix;
use crate::ops::{arith, solve};
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! matrix_binop {
    ($Trait:ident, $method:ident, $func:path) => {
        impl $Trait<&Matrix> for &Matrix {
            type Output = Result<Matrix>;
            fn $method(self, rhs: &Matrix) -> Result<Matrix> {
                $func(self, rhs)
            }
        }
    };
}

matrix_binop!(Add, add, arith::add);
matrix_binop!(Sub, sub, arith::subtract);
matrix_binop!(Mul, mul, arith::multiply);
matrix_binop!(Div, div, solve::divide);

macro_rules! scalar_binop {
    ($Trait:ident, $method:ident, $func:path) => {
        impl $Trait<f64> for &Matrix {
            type Output = Matrix;
            fn $method(self, s: f64) -> Matrix {
                $func(self, s)
            }
        }
    };
}

scalar_binop!(Add, add, arith::add_scalar);
scalar_binop!(Sub, sub, arith::subtract_scalar);
scalar_binop!(Mul, mul, arith::multiply_scalar);

impl Div<f64> for &Matrix {
    type Output = Result<Matrix>;
    fn div(self, s: f64) -> Result<Matrix> {
        solve::divide_scalar(self, s)
    }
}

impl Add<&Matrix> for f64 {
    type Output = Matrix;
    fn add(self, m: &Matrix) -> Matrix {
        arith::add_scalar(m, self)
    }
}

impl Sub<&Matrix> for f64 {
    type Output = Matrix;
    fn sub(self, m: &Matrix) -> Matrix {
        arith::scalar_subtract(self, m)
    }
}

impl Mul<&Matrix> for f64 {
    type Output = Matrix;
    fn mul(self, m: &Matrix) -> Matrix {
        arith::multiply_scalar(m, self)
    }
}

impl Neg for &Matrix {
    type Output = Matrix;
    fn neg(self) -> Matrix {
        arith::negate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatrixError;

    #[test]
    fn operators_match_functions() {
        let a = Matrix::dense_from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let b = Matrix::identity(2).unwrap();
        assert_eq!((&a + &b).unwrap(), arith::add(&a, &b).unwrap());
        assert_eq!((&a - &a).unwrap().nonzero_count(), 0);
        assert_eq!((&a * &b).unwrap(), a);
        assert_eq!((&a / &b).unwrap(), a);
        assert_eq!(&(&a * 2.0) - 1.0, Matrix::dense_from_rows(&[[1.0, 3.0], [5.0, 7.0]]).unwrap());
        assert_eq!(10.0 - &a, Matrix::dense_from_rows(&[[9.0, 8.0], [7.0, 6.0]]).unwrap());
        assert_eq!(-&a, &a * -1.0);
        assert_eq!((&a / 2.0).unwrap(), 0.5 * &a);
        assert_eq!(1.0 + &a, &a + 1.0);
    }

    #[test]
    fn scalar_division_by_zero_fails_for_every_scheme() {
        let a = Matrix::dense_from_rows(&[[0.0, 1.0]]).unwrap();
        for m in [a.clone(), a.to_sparse()] {
            assert!(matches!(&m / 0.0, Err(MatrixError::RankDeficient { rank: 0, required: 1, .. })));
            assert!((&m / -0.0).is_err());
        }
    }
}
