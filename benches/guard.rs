use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

use cityalert::data::MockUserRegistry;
use cityalert::identity::{evaluate_navigation, LoginRequest, Role, Session, SessionStore};
use cityalert::routes::{RouteDescriptor, RouteTable, StaticRouteTable};
use cityalert::storage::MemoryCache;

fn session_for(role: Role) -> Session {
    let registry = Arc::new(MockUserRegistry::new());
    let store = SessionStore::new(registry, Arc::new(MemoryCache::new()));
    let (user, pass) = match role {
        Role::Citizen => ("user001", "123456"),
        Role::Responder => ("responder001", "123456"),
    };
    assert!(store.login(&LoginRequest::new(user, pass, role)).success);
    store.snapshot()
}

fn all_routes(table: &StaticRouteTable) -> Vec<RouteDescriptor> {
    let mut routes = vec![StaticRouteTable::login_route(), StaticRouteTable::main_route()];
    for role in Role::ALL {
        routes.extend(table.routes_for_role(role));
    }
    routes
}

fn bench_guard(c: &mut Criterion) {
    let table = StaticRouteTable;
    let routes = all_routes(&table);
    let sessions = [
        ("anonymous", Session::default()),
        ("citizen", session_for(Role::Citizen)),
        ("responder", session_for(Role::Responder)),
    ];

    let n = 10_000usize;
    let mut rng = StdRng::seed_from_u64(0xC17A_1E27);
    let picks: Vec<usize> = (0..n).map(|_| rng.gen_range(0..routes.len())).collect();

    let mut group = c.benchmark_group("guard_evaluate");
    group.throughput(Throughput::Elements(n as u64));
    for (label, session) in &sessions {
        group.bench_with_input(BenchmarkId::new("mixed_routes", label), session, |b, session| {
            b.iter(|| {
                for &i in &picks {
                    let d = &routes[i];
                    criterion::black_box(evaluate_navigation(session, &d.meta, &d.path, &table));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_guard);
criterion_main!(benches);
