use std::time::Duration;

use ride_hardware::error::HwError;
use ride_hardware::{RideProfile, Segment, SimulatedGps, SimulatedImu};
use ride_traits::{AccelReading, GpsSource, Imu};
use rstest::rstest;

fn two_segment_profile() -> RideProfile {
    RideProfile::new(vec![
        Segment {
            label: "still",
            ticks: 3,
            mean: AccelReading::new(0.0, 0.0, 1.0),
            jitter_g: 0.0,
            gps_kmh: None,
        },
        Segment {
            label: "cruise",
            ticks: 3,
            mean: AccelReading::new(0.4, 0.0, 1.0),
            jitter_g: 0.0,
            gps_kmh: Some(20.0),
        },
    ])
    .expect("non-empty profile")
}

#[test]
fn zero_jitter_reproduces_segment_means() {
    let mut imu = SimulatedImu::with_profile(two_segment_profile(), 1);
    let t = Duration::from_millis(10);
    for _ in 0..3 {
        assert_eq!(imu.read_accel(t).unwrap(), AccelReading::new(0.0, 0.0, 1.0));
    }
    assert_eq!(imu.read_accel(t).unwrap(), AccelReading::new(0.4, 0.0, 1.0));
}

#[rstest]
#[case(3, &[false, false, true, false, false, true])]
#[case(1, &[true, true, true, true, true, true])]
fn timeouts_are_injected_every_nth_read(#[case] every: u64, #[case] expect_err: &[bool]) {
    let mut imu = SimulatedImu::new(9).with_timeouts(every);
    for (i, &want) in expect_err.iter().enumerate() {
        let res = imu.read_accel(Duration::from_millis(5));
        assert_eq!(res.is_err(), want, "read {i}");
        if let Err(e) = res {
            assert!(matches!(e.downcast_ref::<HwError>(), Some(HwError::Timeout)));
        }
    }
}

#[test]
fn gps_reports_no_fix_where_profile_has_none() {
    let mut gps = SimulatedGps::with_profile(two_segment_profile(), 5);
    for _ in 0..3 {
        assert!(gps.poll_fix().unwrap().is_none());
    }
    let fix = gps.poll_fix().unwrap().expect("fix in cruise segment");
    assert_eq!(fix.speed_kmh, 20.0);
    assert!(fix.satellites > 0);
}

#[test]
fn gps_outage_window_suppresses_fix() {
    let mut gps = SimulatedGps::new(5).with_outage(2, 3);
    let fixes: Vec<bool> = (0..7).map(|_| gps.poll_fix().unwrap().is_some()).collect();
    assert_eq!(fixes, vec![true, true, false, false, false, true, true]);
}

#[test]
fn gps_position_advances_while_moving() {
    let mut gps = SimulatedGps::with_profile(two_segment_profile(), 1);
    for _ in 0..3 {
        gps.poll_fix().unwrap();
    }
    let a = gps.poll_fix().unwrap().expect("fix");
    let b = gps.poll_fix().unwrap().expect("fix");
    assert!(b.lat_deg > a.lat_deg);
    assert_eq!(a.lon_deg, b.lon_deg);
}

#[test]
fn hw_error_messages_mention_timeout() {
    assert!(HwError::Timeout.to_string().contains("timeout"));
    assert!(HwError::DataReadyTimeout.to_string().contains("timeout"));
}
