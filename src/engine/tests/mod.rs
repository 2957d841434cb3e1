use self::format::SpanChain;

use super::*;
use crate::gap::Gap;

use tracing_subscriber::fmt::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};


/// Runs `f` with a readable subscriber installed for the current thread.
/// Set `FREESPACE_TEST_LOG` (e.g. `freespace=debug`) to see engine traces.
fn traced<R>(f: impl FnOnce() -> R) -> R {
    let filter = EnvFilter::try_from_env("FREESPACE_TEST_LOG")
        .unwrap_or_else(|_| EnvFilter::new("freespace=info"));
    let subscriber = Registry::default()
        .with(filter)
        .with(Layer::new().event_format(SpanChain).with_test_writer());

    tracing::subscriber::with_default(subscriber, f)
}

fn engine(base_addr: usize, size: usize) -> Engine {
    Engine::new("BEST", base_addr, size).unwrap()
}

fn gaps(engine: &Engine) -> Vec<(usize, usize)> {
    engine
        .free_list()
        .entries()
        .iter()
        .map(|g| (g.address, g.length))
        .collect()
}

/// Builds an engine whose free list holds gaps of the given lengths, each followed
/// by a one byte allocation (handles from 100 on), and a one byte tail gap.
fn fragmented(base_addr: usize, lengths: &[usize]) -> Engine {
    let total: usize = lengths.iter().map(|l| l + 1).sum::<usize>() + 1;
    let mut engine = engine(base_addr, total);
    let mut handle = 0;
    for &len in lengths {
        engine.alloc(Handle(handle), len).unwrap();
        engine.alloc(Handle(100 + handle), 1).unwrap();
        handle += 1;
    }
    for h in 0..handle {
        engine.free(Handle(h));
    }
    engine
}

#[test]
fn test_1() {
    // Alloc, free, alloc again: no merging, and the freed 3 bytes are too small.
    traced(|| {
        let mut engine = engine(1000, 100);

        let res = engine.alloc(Handle(0), 3).unwrap();
        assert_eq!(res, AllocResponse { address: 1000, visited: 1 });
        assert_eq!(gaps(&engine), [(1003, 97)]);

        engine.free(Handle(0));
        assert_eq!(gaps(&engine), [(1000, 3), (1003, 97)]);

        let res = engine.alloc(Handle(1), 5).unwrap();
        assert_eq!(res, AllocResponse { address: 1003, visited: 2 });
        assert_eq!(gaps(&engine), [(1000, 3), (1008, 92)]);
        assert_eq!(engine.accounted_space(), 100);
    });
}

#[test]
fn test_2() {
    // The largest eligible gap wins over the tightest one.
    traced(|| {
        let mut engine = fragmented(1000, &[3, 5, 8, 20]);
        assert_eq!(
            gaps(&engine),
            [(1000, 3), (1004, 5), (1010, 8), (1019, 20), (1040, 1)]
        );

        let res = engine.alloc(Handle(7), 2).unwrap();
        assert_eq!(res, AllocResponse { address: 1019, visited: 5 });
        assert_eq!(
            gaps(&engine),
            [(1000, 3), (1004, 5), (1010, 8), (1021, 18), (1040, 1)]
        );
    });
}

#[test]
fn test_3() {
    // An exact fit fails and leaves everything untouched.
    traced(|| {
        let mut engine = engine(0, 16);
        let free_list = engine.free_list().clone();

        match engine.alloc(Handle(0), 16) {
            Err(Error::NoEligibleGap { requested, visited }) => {
                assert_eq!(requested, 16);
                assert_eq!(visited, 1);
            }
            other => panic!("expected NoEligibleGap, got {other:?}"),
        }
        assert_eq!(engine.free_list(), &free_list);
        assert!(engine.table().is_empty());
    });
}

#[test]
fn test_4() {
    // Split: allocation at the gap start, remainder right after it.
    let mut engine = engine(4096, 64);
    engine.alloc(Handle(9), 10).unwrap();
    assert_eq!(engine.table().get(Handle(9)), Some(Gap::new(4096, 10)));
    assert_eq!(gaps(&engine), [(4106, 54)]);
}

#[test]
fn test_5() {
    // Freeing an unknown handle adds an empty gap at address 0.
    traced(|| {
        let mut engine = engine(1000, 100);
        engine.free(Handle(5));
        assert_eq!(engine.free_list().size(), 2);
        assert_eq!(gaps(&engine), [(0, 0), (1000, 100)]);
        assert_eq!(engine.free_list().free_space(), 100);
        assert_eq!(
            engine.free_list().to_string(),
            "[ addr:0 sz:0 ][ addr:1000 sz:100 ]"
        );
    });
}

#[test]
fn test_6() {
    // Freeing twice: the second free behaves like an unknown handle.
    let mut engine = engine(1000, 100);
    engine.alloc(Handle(0), 10).unwrap();
    engine.free(Handle(0));
    engine.free(Handle(0));
    assert_eq!(gaps(&engine), [(0, 0), (1000, 10), (1010, 90)]);
    assert_eq!(engine.accounted_space(), 100);
}

#[test]
fn test_7() {
    // Visited always equals the free list size before the call.
    let mut engine = fragmented(0, &[4, 4, 4, 4, 4]);
    for h in 200..210 {
        let before = engine.free_list().size();
        match engine.alloc(Handle(h), 1) {
            Ok(res) => assert_eq!(res.visited, before),
            Err(Error::NoEligibleGap { visited, .. }) => assert_eq!(visited, before),
            Err(e) => panic!("{e}"),
        }
    }
}

#[test]
fn test_8() {
    let err = Engine::new("FIRST", 0, 10).unwrap_err();
    assert!(matches!(err, Error::UnknownStrategy(ref n) if n == "FIRST"));
}

#[test]
fn test_9() {
    let mut engine = engine(1000, 100);
    engine.alloc(Handle(0), 3).unwrap();
    engine.alloc(Handle(1), 5).unwrap();
    assert_eq!(engine.strategy_name(), "BEST");
    assert_eq!(engine.base_addr(), 1000);
    assert_eq!(engine.total_space(), 100);
    assert_eq!(
        engine.to_string(),
        "freelist:[ addr:1008 sz:92 ],store:0->[ addr:1000 sz:3 ]\n1->[ addr:1003 sz:5 ]\n"
    );
}

#[test]
fn test_10() {
    // Zero-sized requests are granted an empty range at the gap start.
    let mut engine = engine(1000, 100);
    let res = engine.alloc(Handle(0), 0).unwrap();
    assert_eq!(res, AllocResponse { address: 1000, visited: 1 });
    assert_eq!(gaps(&engine), [(1000, 100)]);
    engine.free(Handle(0));
    assert_eq!(gaps(&engine), [(1000, 100), (1000, 0)]);
}

#[test]
fn test_11() {
    // A real gap freed at the same address as an earlier empty one is still
    // the one handed out.
    let mut engine = engine(0, 100);
    engine.alloc(Handle(0), 10).unwrap();
    engine.free(Handle(1));
    engine.free(Handle(0));
    assert_eq!(gaps(&engine), [(0, 0), (0, 10), (10, 90)]);

    engine.alloc(Handle(2), 89).unwrap();
    let res = engine.alloc(Handle(3), 5).unwrap();
    assert_eq!(res.address, 0);
    assert_eq!(gaps(&engine), [(0, 0), (5, 5), (99, 1)]);
    assert_eq!(engine.accounted_space(), 100);
}

#[test]
fn test_12() {
    // Custom strategies plug in through `with_strategy`.
    #[derive(Debug)]
    struct FirstAny;

    impl Placement for FirstAny {
        fn name(&self) -> &'static str {
            "FIRST_ANY"
        }

        fn select(&mut self, free_list: &FreeList, size: usize) -> Selection {
            let mut visited = 0;
            for &gap in free_list.entries() {
                visited += 1;
                if gap.length >= size {
                    return Selection { gap: Some(gap), visited };
                }
            }
            Selection { gap: None, visited }
        }
    }

    let mut engine = Engine::with_strategy(FirstAny, 0, 8).unwrap();
    assert_eq!(engine.strategy_name(), "FIRST_ANY");
    assert_eq!(engine.alloc(Handle(0), 8).unwrap().address, 0);
    assert!(engine.free_list().is_empty());
    assert!(engine.alloc(Handle(1), 1).is_err());

    assert!(matches!(
        Engine::with_strategy(FirstAny, usize::MAX, 2),
        Err(Error::InvalidRange { .. })
    ));
}

#[test]
fn test_13() {
    // Ranges running past the end of the address space are rejected up front.
    let err = Engine::new("BEST", usize::MAX - 5, 10).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidRange { base_addr, size: 10 } if base_addr == usize::MAX - 5
    ));
    assert!(Engine::new("BEST", usize::MAX, 1).is_err());
}

#[test]
fn test_14() {
    // A range ending exactly at `usize::MAX` is fine and can be split and reused.
    traced(|| {
        let base = usize::MAX - 10;
        let mut engine = engine(base, 10);

        assert_eq!(engine.alloc(Handle(0), 1).unwrap().address, base);
        engine.free(Handle(0));
        let res = engine.alloc(Handle(1), 2).unwrap();
        assert_eq!(res, AllocResponse { address: base + 1, visited: 2 });
        assert_eq!(gaps(&engine), [(base, 1), (base + 3, 7)]);
        assert_eq!(engine.free_list().entries()[1].end(), usize::MAX);
        assert_eq!(engine.accounted_space(), 10);
    });
}
