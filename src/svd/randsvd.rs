//! Randomized truncated svd of a sparse matrix.
//!
//! We implement the range approximation with power iterations (algorithms 4.4 and 5.1 of Halko-Martinsson-Tropp)
//!     *Finding structure with randomness: probabilistic algorithms for constructing approximate matrix decompositions*
//!     N. Halko, P.G. Martinsson, J.A. Tropp. Siam Review 2011
//!
//! The matrix is only accessed through products with dense blocks, so it stays in compressed row storage.
//! Products are parallelized on rows, each row of a result being computed by one task in a fixed order, so
//! results do not depend on the number of threads.
//! The small dense factorizations (qr of range blocks, svd of the projected matrix) are done by lapack.

use std::time::SystemTime;

use cpu_time::ProcessTime;
use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, ArrayView2, Axis};
use ndarray_linalg::{QR, SVD};
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;
use sprs::CsMat;

use super::{check_dimension, ReducedMatrix, SvdReducerT};
use crate::errors::EmbedError;
use crate::params::EmbedParams;

#[cfg_attr(doc, katexit::katexit)]
/// Randomized svd.
///
/// For a $(n,n)$ matrix $A$ and a target rank $k$ we draw a gaussian $(n, l)$ matrix $\Omega$ with $l = k + p$
/// ($p$ is the oversampling) from a generator seeded by the caller. Then
/// - $Q = qr(A \Omega)$ and $q$ times : $Q = qr(A \ qr(A^{t} Q))$
/// - $B = Q^{t} A$ is a small $(l, n)$ matrix. Its svd $B = \hat{U} \Sigma \hat{V}^{t}$ gives the left singular vectors
///   $\hat{U}$ and singular values $\Sigma$
/// - $U = Q \hat{U}$, and the projection of rows of $A$ on the right singular vectors is $A V = U \Sigma$.
///
/// Signs of singular vectors are fixed so that the largest component (in absolute value) of each column of $U$ is positive.
#[derive(Copy, Clone, Debug)]
pub struct RandomizedSvd {
    /// number of power iterations
    nb_power_iter: usize,
    /// number of random vectors added to the target rank
    oversampling: usize,
} // end of RandomizedSvd

impl RandomizedSvd {
    pub fn new(nb_power_iter: usize, oversampling: usize) -> Self {
        RandomizedSvd {
            nb_power_iter,
            oversampling,
        }
    }

    pub fn from_params(params: &EmbedParams) -> Self {
        RandomizedSvd::new(params.get_nb_power_iter(), params.get_oversampling())
    }

    /// returns the first dimension left singular vectors scaled by singular values, and the singular values
    pub fn decompose(&self, mat: &CsMat<f64>, dimension: usize, seed: u64) -> Result<ReducedMatrix, EmbedError> {
        //
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let (nb_row, nb_col) = mat.shape();
        check_dimension(dimension, nb_row.min(nb_col))?;
        let csr_mat;
        let mat = if mat.is_csr() {
            mat
        } else {
            csr_mat = mat.to_csr();
            &csr_mat
        };
        let nb_vec = (dimension + self.oversampling).min(nb_row).min(nb_col);
        log::info!(
            "RandomizedSvd decompose ({},{}) matrix, rank : {}, nb random vectors : {}, nb power iterations : {}",
            nb_row,
            nb_col,
            dimension,
            nb_vec,
            self.nb_power_iter
        );
        // we need products by the transpose
        let mat_t: CsMat<f64> = mat.transpose_view().to_csr();
        //
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let omega = Array2::<f64>::from_shape_fn((nb_col, nb_vec), |_| {
            let v: f64 = StandardNormal.sample(&mut rng);
            v
        });
        let mut q = orthonormal_basis(csr_dense_product(mat, omega.view()))?;
        for iter in 0..self.nb_power_iter {
            let z = orthonormal_basis(csr_dense_product(&mat_t, q.view()))?;
            q = orthonormal_basis(csr_dense_product(mat, z.view()))?;
            log::debug!("RandomizedSvd power iteration {} done", iter);
        }
        // B = Q^t A = (A^t Q)^t is (nb_vec, nb_col)
        let b = csr_dense_product(&mat_t, q.view()).reversed_axes();
        let (u_hat, sigma_all, _) = match b.svd(true, false) {
            Ok(res) => res,
            Err(e) => {
                log::error!("RandomizedSvd svd of projected matrix failed : {}", e);
                return Err(EmbedError::Decomposition(e.to_string()));
            }
        };
        let u_hat = match u_hat {
            Some(u_hat) => u_hat,
            None => {
                return Err(EmbedError::Decomposition(String::from("svd did not return left singular vectors")));
            }
        };
        //
        let sigma = sigma_all.slice(s![0..dimension]).to_owned();
        log::debug!("RandomizedSvd singular values : {:?}", sigma);
        if sigma[0] > 0. {
            log::info!(
                "RandomizedSvd last singular value to first : {:.3e}",
                sigma[dimension - 1] / sigma[0]
            );
        }
        let mut u = q.dot(&u_hat.slice(s![.., 0..dimension]));
        flip_signs(&mut u);
        for (j, mut column) in u.axis_iter_mut(Axis(1)).enumerate() {
            let sigma_j = sigma[j];
            column.mapv_inplace(|x| x * sigma_j);
        }
        // a null row of mat has a null projection, whatever the rounding in Q
        let mut nb_null = 0usize;
        for (i, mut row) in u.axis_iter_mut(Axis(0)).enumerate() {
            let is_null = match mat.outer_view(i) {
                Some(mat_row) => mat_row.iter().all(|(_, v)| *v == 0.),
                None => true,
            };
            if is_null {
                row.fill(0.);
                nb_null += 1;
            }
        }
        log::debug!("RandomizedSvd nb null rows : {}", nb_null);
        //
        log::info!(
            "RandomizedSvd decompose sys time(ms) {:?} cpu time(ms) {:?}",
            sys_start.elapsed().map(|t| t.as_millis()).unwrap_or(0),
            cpu_start.elapsed().as_millis()
        );
        Ok(ReducedMatrix { projected: u, sigma })
    } // end of decompose
} // end of impl RandomizedSvd

impl Default for RandomizedSvd {
    fn default() -> Self {
        let params = EmbedParams::default();
        RandomizedSvd::from_params(&params)
    }
}

impl SvdReducerT for RandomizedSvd {
    fn reduce(&self, mat: &CsMat<f64>, dimension: usize, seed: u64) -> Result<ReducedMatrix, EmbedError> {
        self.decompose(mat, dimension, seed)
    }
} // end of impl SvdReducerT for RandomizedSvd

/// computes csr_mat * x, parallelized on rows of csr_mat
pub(crate) fn csr_dense_product(csr_mat: &CsMat<f64>, x: ArrayView2<f64>) -> Array2<f64> {
    //
    assert!(csr_mat.is_csr());
    assert_eq!(csr_mat.cols(), x.nrows());
    //
    let mut y = Array2::<f64>::zeros((csr_mat.rows(), x.ncols()));
    y.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut y_row)| {
            if let Some(row) = csr_mat.outer_view(i) {
                for (j, val) in row.iter() {
                    y_row.scaled_add(*val, &x.row(j));
                }
            }
        });
    y
} // end of csr_dense_product

// orthonormal basis of the range of x (ncols <= nrows) by a thin qr
fn orthonormal_basis(x: Array2<f64>) -> Result<Array2<f64>, EmbedError> {
    match x.qr() {
        Ok((q, _)) => Ok(q),
        Err(e) => {
            log::error!("orthonormal_basis qr failed : {}", e);
            Err(EmbedError::Decomposition(e.to_string()))
        }
    }
} // end of orthonormal_basis

// makes the largest component in absolute value of each column positive
fn flip_signs(u: &mut Array2<f64>) {
    for mut column in u.axis_iter_mut(Axis(1)) {
        let mut max_abs = 0.;
        let mut max_val = 0.;
        for v in column.iter() {
            if v.abs() > max_abs {
                max_abs = v.abs();
                max_val = *v;
            }
        }
        if max_val < 0. {
            column.mapv_inplace(|v| -v);
        }
    }
} // end of flip_signs

#[cfg(test)]
mod tests {

    use super::*;
    use rand::Rng;
    use rand_distr::Uniform;
    use sprs::TriMatI;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn diagonal_csr(values: &[f64]) -> CsMat<f64> {
        let n = values.len();
        let mut trimat = TriMatI::<f64, usize>::new((n, n));
        for (i, v) in values.iter().enumerate() {
            trimat.add_triplet(i, i, *v);
        }
        trimat.to_csr()
    }

    #[test]
    fn test_csr_dense_product() {
        log_init_test();
        //
        let dense = ndarray::arr2(&[[1., 0., 2.], [0., 0., 0.], [0., 3., 4.], [5., 0., 0.]]);
        let csr_mat = CsMat::csr_from_dense(dense.view(), 0.);
        let x = Array2::from_shape_fn((3, 2), |(i, j)| (i + 2 * j) as f64 - 1.);
        let y = csr_dense_product(&csr_mat, x.view());
        let expected = dense.dot(&x);
        for i in 0..4 {
            for j in 0..2 {
                assert!((y[[i, j]] - expected[[i, j]]).abs() < 1.0E-12);
            }
        }
        // transposed product
        let csr_t: CsMat<f64> = csr_mat.transpose_view().to_csr();
        let z = csr_dense_product(&csr_t, y.view());
        let expected_t = dense.t().dot(&expected);
        for i in 0..3 {
            for j in 0..2 {
                assert!((z[[i, j]] - expected_t[[i, j]]).abs() < 1.0E-12);
            }
        }
    } // end of test_csr_dense_product

    #[test]
    fn test_orthonormal_basis_rank_deficient() {
        log_init_test();
        // third column is the sum of the first two
        let x = ndarray::arr2(&[[1., 1., 2.], [0., 1., 1.], [1., 0., 1.], [2., 3., 5.]]);
        let q = orthonormal_basis(x.clone()).unwrap();
        assert_eq!(q.dim(), (4, 3));
        let qtq = q.t().dot(&q);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1. } else { 0. };
                assert!((qtq[[i, j]] - expected).abs() < 1.0E-12);
            }
        }
        // columns of x are in the range of q
        let residual = &x - &q.dot(&q.t().dot(&x));
        assert!(residual.iter().all(|v| v.abs() < 1.0E-12));
    } // end of test_orthonormal_basis_rank_deficient

    #[test]
    fn test_randsvd_diagonal_exact() {
        log_init_test();
        // nb random vectors is clamped to 3 so the range is exact
        let csr_mat = diagonal_csr(&[3., 2., 1.]);
        let reduced = RandomizedSvd::new(2, 10).reduce(&csr_mat, 2, 1).unwrap();
        let projected = &reduced.projected;
        assert_eq!(projected.dim(), (3, 2));
        log::debug!("projected : {:?}", projected);
        assert!((reduced.sigma[0] - 3.).abs() < 1.0E-10);
        assert!((reduced.sigma[1] - 2.).abs() < 1.0E-10);
        let expected = ndarray::arr2(&[[3., 0.], [0., 2.], [0., 0.]]);
        for i in 0..3 {
            for j in 0..2 {
                assert!((projected[[i, j]] - expected[[i, j]]).abs() < 1.0E-10);
            }
        }
    } // end of test_randsvd_diagonal_exact

    #[test]
    fn test_randsvd_null_row() {
        log_init_test();
        // the null row is in the first columns range of the qr
        let csr_mat = diagonal_csr(&[3., 0., 2., 1.]);
        let reduced = RandomizedSvd::default().reduce(&csr_mat, 2, 1).unwrap();
        assert!(reduced.projected.row(1).iter().all(|x| *x == 0.));
        assert!((reduced.projected[[0, 0]] - 3.).abs() < 1.0E-10);
        assert!((reduced.projected[[2, 1]] - 2.).abs() < 1.0E-10);
    } // end of test_randsvd_null_row

    #[test]
    fn test_randsvd_leading_singular_values() {
        log_init_test();
        // well separated leading values, the tail is 1.
        let mut values = vec![1.; 40];
        values[7] = 100.;
        values[21] = 50.;
        values[33] = 25.;
        let csr_mat = diagonal_csr(&values);
        let reduced = RandomizedSvd::new(4, 5).reduce(&csr_mat, 3, 17).unwrap();
        assert_eq!(reduced.projected.dim(), (40, 3));
        assert!((reduced.sigma[0] - 100.).abs() < 1.0E-6);
        assert!((reduced.sigma[1] - 50.).abs() < 1.0E-6);
        assert!((reduced.sigma[2] - 25.).abs() < 1.0E-6);
        // row 7 is projected on first component, positive after sign flip
        assert!((reduced.projected[[7, 0]] - 100.).abs() < 1.0E-6);
        assert!((reduced.projected[[21, 1]] - 50.).abs() < 1.0E-6);
        assert!((reduced.projected[[33, 2]] - 25.).abs() < 1.0E-6);
        assert!(reduced.projected[[0, 0]].abs() < 1.0E-6);
    } // end of test_randsvd_leading_singular_values

    #[test]
    fn test_randsvd_reproducible() {
        log_init_test();
        //
        let n = 60;
        let mut trimat = TriMatI::<f64, usize>::new((n, n));
        for i in 0..n {
            trimat.add_triplet(i, (i * 7 + 3) % n, 1. + (i % 5) as f64);
            trimat.add_triplet(i, (i * 11 + 1) % n, 0.5);
        }
        let csr_mat: CsMat<f64> = trimat.to_csr();
        let svd = RandomizedSvd::new(3, 10);
        let first = svd.reduce(&csr_mat, 8, 1234).unwrap();
        let second = svd.reduce(&csr_mat, 8, 1234).unwrap();
        assert_eq!(first.projected, second.projected);
        assert_eq!(first.sigma, second.sigma);
        for j in 1..8 {
            assert!(first.sigma[j - 1] >= first.sigma[j]);
        }
    } // end of test_randsvd_reproducible

    #[test]
    fn test_randsvd_exact_range_against_dense_svd() {
        log_init_test();
        // a non symmetric sparse matrix with generic weights
        let n = 30;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4321);
        let unif = Uniform::<f64>::new(0.1, 1.);
        let mut trimat = TriMatI::<f64, usize>::new((n, n));
        for i in 0..n {
            for _ in 0..3 {
                let j = rng.gen_range(0..n);
                trimat.add_triplet(i, j, unif.sample(&mut rng));
            }
        }
        let csr_mat: CsMat<f64> = trimat.to_csr();
        let dense = csr_mat.to_dense();
        let dim = 6;
        // nb random vectors is clamped to n so the range is exact
        let reduced = RandomizedSvd::new(5, n).reduce(&csr_mat, dim, 11).unwrap();
        let (_, s_ref, vt_ref) = dense.svd(false, true).unwrap();
        let vt_ref = vt_ref.unwrap();
        log::debug!("reference singular values : {:?}", s_ref);
        let eps = 1.0E-10 * s_ref[0];
        for j in 0..dim {
            assert!((reduced.sigma[j] - s_ref[j]).abs() < eps);
            // column j is A v_j, up to the sign of v_j
            let av = dense.dot(&vt_ref.row(j));
            let column = reduced.projected.column(j);
            let sign = if column.dot(&av) >= 0. { 1. } else { -1. };
            for i in 0..n {
                assert!((column[i] - sign * av[i]).abs() < eps);
            }
            // largest component is positive
            let largest = column.iter().fold(0f64, |acc, x| if x.abs() > acc.abs() { *x } else { acc });
            assert!(largest > 0.);
        }
    } // end of test_randsvd_exact_range_against_dense_svd

    #[test]
    fn test_randsvd_bad_dimension() {
        log_init_test();
        //
        let csr_mat = diagonal_csr(&[3., 2., 1.]);
        let res = RandomizedSvd::default().reduce(&csr_mat, 3, 1);
        assert!(matches!(res, Err(EmbedError::InvalidConfiguration(_))));
    } // end of test_randsvd_bad_dimension
} // end of mod tests
