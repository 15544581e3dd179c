//! EPA breakpoint tables and piecewise-linear AQI conversion
//!
//! Each table maps a concentration range `[c_low, c_high]` onto an index
//! range `[i_low, i_high]`. Concentrations above the last row, below zero or
//! inside a gap between rows have no index; callers get `None` and must not
//! treat it as zero.

use crate::models::Pollutant;

/// One row of a breakpoint table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub c_low: f64,
    pub c_high: f64,
    pub i_low: u16,
    pub i_high: u16,
}

const fn row(c_low: f64, c_high: f64, i_low: u16, i_high: u16) -> Breakpoint {
    Breakpoint {
        c_low,
        c_high,
        i_low,
        i_high,
    }
}

/// Breakpoint rows for one pollutant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakpointTable {
    pub pollutant: Pollutant,
    /// Decimal places concentrations are reported with
    pub precision: i32,
    pub rows: &'static [Breakpoint],
}

// μg/m³, 24-hour
pub const PM25: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::Pm25,
    precision: 1,
    rows: &[
        row(0.0, 12.0, 0, 50),
        row(12.1, 35.4, 51, 100),
        row(35.5, 55.4, 101, 150),
        row(55.5, 150.4, 151, 200),
        row(150.5, 250.4, 201, 300),
        row(250.5, 350.4, 301, 400),
        row(350.5, 500.4, 401, 500),
    ],
};

// μg/m³, 24-hour
pub const PM10: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::Pm10,
    precision: 0,
    rows: &[
        row(0.0, 54.0, 0, 50),
        row(55.0, 154.0, 51, 100),
        row(155.0, 254.0, 101, 150),
        row(255.0, 354.0, 151, 200),
        row(355.0, 424.0, 201, 300),
        row(425.0, 504.0, 301, 400),
        row(505.0, 604.0, 401, 500),
    ],
};

// ppb, 1-hour
pub const NO2: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::No2,
    precision: 0,
    rows: &[
        row(0.0, 53.0, 0, 50),
        row(54.0, 100.0, 51, 100),
        row(101.0, 360.0, 101, 150),
        row(361.0, 649.0, 151, 200),
        row(650.0, 1249.0, 201, 300),
        row(1250.0, 1649.0, 301, 400),
        row(1650.0, 2049.0, 401, 500),
    ],
};

// ppb, 8-hour; the 8-hour table stops at 300
pub const O3: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::O3,
    precision: 0,
    rows: &[
        row(0.0, 54.0, 0, 50),
        row(55.0, 70.0, 51, 100),
        row(71.0, 85.0, 101, 150),
        row(86.0, 105.0, 151, 200),
        row(106.0, 200.0, 201, 300),
    ],
};

// ppb, 1-hour
pub const SO2: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::So2,
    precision: 0,
    rows: &[
        row(0.0, 35.0, 0, 50),
        row(36.0, 75.0, 51, 100),
        row(76.0, 185.0, 101, 150),
        row(186.0, 304.0, 151, 200),
        row(305.0, 604.0, 201, 300),
        row(605.0, 804.0, 301, 400),
        row(805.0, 1004.0, 401, 500),
    ],
};

// ppm, 8-hour
pub const CO: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::Co,
    precision: 1,
    rows: &[
        row(0.0, 4.4, 0, 50),
        row(4.5, 9.4, 51, 100),
        row(9.5, 12.4, 101, 150),
        row(12.5, 15.4, 151, 200),
        row(15.5, 30.4, 201, 300),
        row(30.5, 40.4, 301, 400),
        row(40.5, 50.4, 401, 500),
    ],
};

/// Interpolate `concentration` over the first row that contains it.
///
/// Returns `None` when no row contains the concentration. There is no
/// extrapolation past the last row.
#[must_use]
pub fn linear_index(concentration: f64, rows: &[Breakpoint]) -> Option<f64> {
    rows.iter()
        .find(|bp| bp.c_low <= concentration && concentration <= bp.c_high)
        .map(|bp| {
            // Ilow + (Ihigh - Ilow) * fraction is exact at both row edges
            let fraction = (concentration - bp.c_low) / (bp.c_high - bp.c_low);
            f64::from(bp.i_low) + f64::from(bp.i_high - bp.i_low) * fraction
        })
}

impl BreakpointTable {
    /// Table for a pollutant
    #[must_use]
    pub fn for_pollutant(pollutant: Pollutant) -> &'static BreakpointTable {
        match pollutant {
            Pollutant::Pm25 => &PM25,
            Pollutant::Pm10 => &PM10,
            Pollutant::No2 => &NO2,
            Pollutant::O3 => &O3,
            Pollutant::So2 => &SO2,
            Pollutant::Co => &CO,
        }
    }

    /// Raw interpolation without truncation
    #[must_use]
    pub fn linear_index(&self, concentration: f64) -> Option<f64> {
        linear_index(concentration, self.rows)
    }

    /// Truncate a concentration to the table's reporting precision
    #[must_use]
    pub fn truncate(&self, concentration: f64) -> f64 {
        let scale = 10f64.powi(self.precision);
        // Nudge before flooring so 35.4 * 10 does not land on 353.999...
        ((concentration * scale) + 1e-9).floor() / scale
    }

    /// AQI sub-index rounded to the nearest integer
    #[must_use]
    pub fn sub_index(&self, concentration: f64) -> Option<u16> {
        if !concentration.is_finite() {
            return None;
        }
        self.linear_index(self.truncate(concentration))
            .map(|index| index.round() as u16)
    }

    /// Highest concentration the table can index
    #[must_use]
    pub fn max_concentration(&self) -> f64 {
        self.rows.last().map_or(0.0, |bp| bp.c_high)
    }
}

/// PM2.5 AQI for a 24-hour concentration in μg/m³
#[must_use]
pub fn calculate_pm25_aqi(pm25: f64) -> Option<u16> {
    PM25.sub_index(pm25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ALL_TABLES: [&BreakpointTable; 6] = [&PM25, &PM10, &NO2, &O3, &SO2, &CO];

    #[test]
    fn test_pm25_row_edges_are_exact() {
        for bp in PM25.rows {
            assert_eq!(linear_index(bp.c_low, PM25.rows), Some(f64::from(bp.i_low)));
            assert_eq!(linear_index(bp.c_high, PM25.rows), Some(f64::from(bp.i_high)));
        }
    }

    #[test]
    fn test_all_row_edges_are_exact() {
        for table in ALL_TABLES {
            for bp in table.rows {
                assert_eq!(table.sub_index(bp.c_low), Some(bp.i_low), "{:?}", table.pollutant);
                assert_eq!(table.sub_index(bp.c_high), Some(bp.i_high), "{:?}", table.pollutant);
            }
        }
    }

    #[test]
    fn test_monotonic_within_table() {
        for table in ALL_TABLES {
            let mut last = f64::NEG_INFINITY;
            let steps = 200_000;
            for step in 0..=steps {
                let concentration = table.max_concentration() * f64::from(step) / f64::from(steps);
                if let Some(index) = table.linear_index(concentration) {
                    assert!(
                        index >= last,
                        "{:?} decreased at {concentration}: {index} < {last}",
                        table.pollutant
                    );
                    last = index;
                }
            }
        }
    }

    #[rstest]
    #[case(0.0, Some(0))]
    #[case(6.0, Some(25))]
    #[case(12.0, Some(50))]
    #[case(12.05, Some(50))]
    #[case(35.4, Some(100))]
    #[case(35.45, Some(100))]
    #[case(45.0, Some(124))]
    #[case(150.4, Some(200))]
    #[case(500.4, Some(500))]
    #[case(500.5, None)]
    #[case(-1.0, None)]
    fn test_pm25_sub_index(#[case] concentration: f64, #[case] expected: Option<u16>) {
        assert_eq!(calculate_pm25_aqi(concentration), expected);
    }

    #[test]
    fn test_gap_between_rows_is_uncomputable_without_truncation() {
        assert_eq!(PM25.linear_index(12.05), None);
        assert_eq!(PM10.linear_index(54.5), None);
        assert_eq!(PM25.truncate(12.05), 12.0);
        assert_eq!(PM10.truncate(54.9), 54.0);
    }

    #[test]
    fn test_above_scale_is_uncomputable() {
        for table in ALL_TABLES {
            let beyond = table.max_concentration() + 1.0;
            assert_eq!(table.linear_index(beyond), None, "{:?}", table.pollutant);
            assert_eq!(table.sub_index(beyond), None, "{:?}", table.pollutant);
        }
        // The 8-hour ozone table has no hazardous rows
        assert_eq!(O3.sub_index(201.0), None);
    }

    #[test]
    fn test_non_finite_is_uncomputable() {
        assert_eq!(calculate_pm25_aqi(f64::NAN), None);
        assert_eq!(calculate_pm25_aqi(f64::INFINITY), None);
        assert_eq!(PM25.linear_index(f64::NAN), None);
    }

    #[test]
    fn test_truncate_keeps_reported_values() {
        assert_eq!(PM25.truncate(35.4), 35.4);
        assert_eq!(CO.truncate(9.4), 9.4);
        assert_eq!(NO2.truncate(100.0), 100.0);
        assert_eq!(NO2.truncate(100.99), 100.0);
    }

    #[test]
    fn test_conversion_is_pure() {
        for concentration in [0.0, 7.3, 41.2, 199.9, 349.0] {
            let first = PM25.linear_index(concentration).unwrap();
            let second = PM25.linear_index(concentration).unwrap();
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[rstest]
    #[case(Pollutant::Pm25, &PM25)]
    #[case(Pollutant::Pm10, &PM10)]
    #[case(Pollutant::No2, &NO2)]
    #[case(Pollutant::O3, &O3)]
    #[case(Pollutant::So2, &SO2)]
    #[case(Pollutant::Co, &CO)]
    fn test_table_lookup(#[case] pollutant: Pollutant, #[case] expected: &BreakpointTable) {
        let table = BreakpointTable::for_pollutant(pollutant);
        assert_eq!(table, expected);
        assert_eq!(table.pollutant, pollutant);
    }

    #[test]
    fn test_rows_are_ordered() {
        for table in ALL_TABLES {
            for pair in table.rows.windows(2) {
                assert!(pair[0].c_high < pair[1].c_low);
                assert!(pair[0].i_high < pair[1].i_low);
            }
        }
    }
}
