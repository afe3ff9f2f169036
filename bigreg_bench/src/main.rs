use anyhow::{ensure, Result};
use bigreg::rand::XorShift32;
use bigreg::{BigUnsigned, Status, Workspace};
use clap::{Parser, ValueEnum};
use tracing::{info, instrument, warn};

use std::time::{Duration, Instant};

/// Divisor exponent for the single limb division case, 2^5 - 1
const DIV_U32_K: u32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Case {
    Mul,
    MulFast,
    DivU32,
    Div,
    DivMersenne,
    DivFast,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// number of timed executions per case
    #[arg(short = 'n', long, default_value_t = 500_000)]
    iterations: u32,

    /// limbs allocated for every register up front
    #[arg(short, long, default_value_t = 100)]
    limbs: usize,

    /// the divisor and multiplier are built around 2^k
    #[arg(short, long, default_value_t = 70)]
    k: u32,

    /// the dividend and multiplicand are 2 + 2^bk
    #[arg(long, default_value_t = 128)]
    bk: u32,

    /// cases to run, all of them if not given
    #[arg(short, long, value_enum)]
    case: Vec<Case>,

    /// randomise the low limbs of the dividend with this seed
    #[arg(short, long)]
    seed: Option<u32>,
}

/// Registers allocated once per case, like a caller reusing its scratch
struct Registers {
    a: BigUnsigned,
    b: BigUnsigned,
    out: BigUnsigned,
    rem: BigUnsigned,
    ws: Workspace,
}

impl Registers {
    fn new(limbs: usize) -> Self {
        Self {
            a: BigUnsigned::with_capacity(limbs),
            b: BigUnsigned::with_capacity(limbs),
            out: BigUnsigned::with_capacity(limbs),
            rem: BigUnsigned::with_capacity(limbs),
            ws: Workspace::with_capacity(limbs),
        }
    }
}

struct Bench {
    args: Args,
    noise: BigUnsigned,
}

impl Bench {
    fn new(args: Args) -> Self {
        let noise = match args.seed {
            Some(seed) => {
                let mut rng = XorShift32::from_seed(seed.max(1));
                let mut noise = BigUnsigned::random(&mut rng, (args.bk / 32) as usize);
                noise.rem_pow2(args.bk);
                noise
            }
            None => BigUnsigned::new(),
        };

        Self { args, noise }
    }

    /// a = 2 + 2^bk, plus the random low limbs if seeded
    fn set_dividend(&self, a: &mut BigUnsigned) {
        a.set_u32(2);
        a.add_pow2(self.args.bk);
        a.add_big(&self.noise);
    }

    fn set_divisor(&self, b: &mut BigUnsigned) -> Result<()> {
        ensure!(self.args.k > 0, "k = 0 gives a zero divisor");
        b.set_zero();
        b.add_pow2(self.args.k);
        let status = b.decrement();
        debug_assert!(status.is_exact());
        Ok(())
    }

    /// Run one case, returning the average time of an execution
    #[instrument(skip(self))]
    fn run(&self, case: Case) -> Result<Duration> {
        let mut regs = Registers::new(self.args.limbs);
        let mut total = Duration::ZERO;

        for _ in 0..self.args.iterations {
            self.prepare(case, &mut regs)?;

            // only the arithmetic call is timed
            let start = Instant::now();
            let status = self.execute(case, &mut regs);
            total += start.elapsed();

            ensure!(status.is_exact(), "{case:?}: returned {status:?}");
            self.verify(case, &mut regs)?;
        }

        Ok(total / self.args.iterations.max(1))
    }

    /// Load the operands for one execution, `out` starts as a copy of `a`
    fn prepare(&self, case: Case, regs: &mut Registers) -> Result<()> {
        let Registers { a, b, out, .. } = regs;

        self.set_dividend(a);
        out.copy_from(a);
        match case {
            Case::Mul | Case::MulFast => {
                b.set_u32(24);
                b.add_pow2(self.args.k);
            }
            Case::DivU32 => b.set_u32((1 << DIV_U32_K) - 1),
            Case::Div | Case::DivMersenne | Case::DivFast => self.set_divisor(b)?,
        }

        Ok(())
    }

    /// The timed part of an execution
    fn execute(&self, case: Case, regs: &mut Registers) -> Status {
        let Registers { b, out, rem, ws, .. } = regs;

        match case {
            Case::Mul => {
                out.mul_big_with(b, ws);
                Status::Exact
            }
            Case::MulFast => {
                out.mul_big_fast_with(b, ws);
                Status::Exact
            }
            Case::DivU32 => {
                let (r, status) = out.div_u32(b.truncate_u32());
                rem.set_u32(r);
                status
            }
            Case::Div => out.div_big(b, rem),
            Case::DivMersenne => out.div_pow2_minus_one(self.args.k, rem),
            Case::DivFast => out.div_big_fast_with(b, rem, ws),
        }
    }

    /// Check the result left behind by `execute`
    fn verify(&self, case: Case, regs: &mut Registers) -> Result<()> {
        let Registers {
            a,
            b,
            out,
            rem,
            ws,
        } = regs;

        match case {
            // the product divides back to the multiplicand exactly
            Case::Mul | Case::MulFast => {
                let status = out.div_big_fast_with(b, rem, ws);
                ensure!(status.is_exact(), "{case:?}: dividing back returned {status:?}");
                ensure!(rem.is_zero(), "{case:?}: product leaves remainder {rem}");
                ensure!(out == a, "{case:?}: product / {b} = {out}, expected {a}");
            }
            Case::DivU32 | Case::Div | Case::DivMersenne | Case::DivFast => {
                ensure!(*rem < *b, "{case:?}: remainder {rem} is not below {b}");
                out.mul_big_with(b, ws);
                out.add_big(rem);
                ensure!(out == a, "{case:?}: q * {b} + {rem} = {out}, expected {a}");
            }
        }

        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = Args::try_parse()?;

    let cases = if args.case.is_empty() {
        Case::value_variants().to_vec()
    } else {
        args.case.clone()
    };

    let bench = Bench::new(args);
    let mut failed = 0;
    for &case in &cases {
        match bench.run(case) {
            Ok(average) => {
                let average_ms = average.as_secs_f64() * 1e3;
                info!(?case, "average time: {average_ms:e} ms");
            }
            Err(e) => {
                warn!(?case, "failed: {e}");
                failed += 1;
            }
        }
    }

    let n = cases.len();
    match failed {
        0 => println!("Tests completed: All succeeded"),
        f if f == n => println!("Tests completed: All failed"),
        f => println!("Tests completed: {f} failed and {} succeeded", n - f),
    }

    Ok(())
}
