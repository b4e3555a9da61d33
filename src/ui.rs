use crate::models::TrackerView;

pub fn render_index(view: &TrackerView) -> String {
    let theme = if view.is_dark_mode { "dark-mode" } else { "" };
    INDEX_HTML
        .replace("{{BALANCE}}", &view.balance.to_string())
        .replace("{{THEME}}", theme)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Chore Tracker</title>
  <style>
    :root {
      --bg: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.9);
      --muted: #7a746d;
    }

    body.dark-mode {
      --bg: #1d2126;
      --ink: #ece7df;
      --card: rgba(40, 46, 54, 0.95);
      --muted: #a59f97;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      padding: 20px;
      box-shadow: 0 16px 40px rgba(47, 72, 88, 0.15);
    }

    .balance {
      font-size: 2.4rem;
      font-weight: 600;
      color: var(--accent);
    }

    .columns {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 20px;
    }

    ul {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 8px;
    }

    li {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 8px;
    }

    small, .muted {
      color: var(--muted);
    }

    .credit {
      color: #2d7a4b;
    }

    .debit {
      color: #c63b2b;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 6px 12px;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
    }
  </style>
</head>
<body class="{{THEME}}">
  <main class="app">
    <header class="card">
      <div class="muted">Balance</div>
      <div class="balance" id="balance">{{BALANCE}}</div>
      <label><input type="checkbox" id="dark-mode" /> Dark mode</label>
      <div class="status" id="status"></div>
    </header>

    <section class="columns">
      <div class="card">
        <h2>Chores</h2>
        <form id="chore-form">
          <input name="name" placeholder="Chore" required />
          <input name="value" type="number" min="1" placeholder="Points" required />
          <button type="submit">Add</button>
        </form>
        <select id="chore-sort" data-catalog="chores">
          <option value="value-asc">Points (low to high)</option>
          <option value="value-desc">Points (high to low)</option>
          <option value="alpha">Alphabetical</option>
        </select>
        <ul id="chore-list"></ul>
      </div>

      <div class="card">
        <h2>Rewards</h2>
        <form id="reward-form">
          <input name="name" placeholder="Reward" required />
          <input name="value" type="number" min="1" placeholder="Cost" required />
          <button type="submit">Add</button>
        </form>
        <select id="reward-sort" data-catalog="rewards">
          <option value="value-desc">Cost (high to low)</option>
          <option value="value-asc">Cost (low to high)</option>
          <option value="alpha">Alphabetical</option>
        </select>
        <ul id="reward-list"></ul>
      </div>
    </section>

    <section class="columns">
      <div class="card">
        <h2>Completed today</h2>
        <ul id="today-list"></ul>
      </div>
      <div class="card">
        <h2>History</h2>
        <ul id="transaction-list"></ul>
        <p>
          <a href="/api/export">Download data</a>
          <input type="file" id="upload" accept="application/json" />
        </p>
      </div>
    </section>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const esc = (text) => String(text).replace(/[&<>"]/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' }[c]));

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const call = async (method, url, body, raw) => {
      const res = await fetch(url, {
        method,
        headers: raw ? {} : { 'content-type': 'application/json' },
        body: raw ? body : body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      render(await res.json());
      setStatus('', '');
    };

    const act = (promise) => promise.catch((err) => setStatus(err.message, 'error'));

    const itemRow = (kind, item, value, sign, verb, editing) => {
      if (editing === item.id) {
        return `<li data-id="${item.id}" data-kind="${kind}">
          <span><input class="edit-name" value="${esc(item.name)}" />
          <input class="edit-value" type="number" min="1" value="${value}" /></span>
          <span><button data-action="save">Save</button>
          <button data-action="cancel">Cancel</button>
          <button data-action="delete">Delete</button></span></li>`;
      }
      return `<li data-id="${item.id}" data-kind="${kind}">
        <span>${esc(item.name)} <small>(${sign}${value})</small></span>
        <span><button data-action="edit">Edit</button>
        <button data-action="${verb}">${verb[0].toUpperCase() + verb.slice(1)}</button></span></li>`;
    };

    const render = (view) => {
      document.body.classList.toggle('dark-mode', view.is_dark_mode);
      document.getElementById('dark-mode').checked = view.is_dark_mode;
      document.getElementById('balance').textContent = view.balance;
      document.getElementById('chore-sort').value = view.chore_sort_order;
      document.getElementById('reward-sort').value = view.reward_sort_order;

      document.getElementById('chore-list').innerHTML = view.chores
        .map((c) => itemRow('chores', c, c.points, '+', 'complete', view.editing_chore))
        .join('');
      document.getElementById('reward-list').innerHTML = view.rewards
        .map((r) => itemRow('rewards', r, r.cost, '-', 'redeem', view.editing_reward))
        .join('');

      document.getElementById('today-list').innerHTML = view.today.length
        ? view.today.map((t) => `<li><span>${esc(t.name)} <small>(+${t.amount})</small></span></li>`).join('')
        : '<li class="muted">No chores completed today.</li>';

      document.getElementById('transaction-list').innerHTML = view.transactions
        .map((tx) => `<li><span>${esc(tx.description)}<br /><small>${new Date(tx.timestamp).toLocaleString()}</small></span>
          <span><span class="${tx.type}">(${tx.type === 'credit' ? '+' : '-'}${tx.amount})</span>
          <button data-undo="${tx.id}">Undo</button></span></li>`)
        .join('');
    };

    for (const kind of ['chore', 'reward']) {
      document.getElementById(`${kind}-form`).addEventListener('submit', (event) => {
        event.preventDefault();
        const form = event.target;
        const body = {
          name: form.querySelector('[name=name]').value,
          value: parseInt(form.querySelector('[name=value]').value, 10)
        };
        act(call('POST', `/api/${kind}s`, body).then(() => form.reset()));
      });

      document.getElementById(`${kind}-list`).addEventListener('click', (event) => {
        const action = event.target.dataset.action;
        const li = event.target.closest('li');
        if (!action || !li) {
          return;
        }
        const base = `/api/${li.dataset.kind}/${li.dataset.id}`;
        if (action === 'delete') {
          act(call('DELETE', base));
        } else if (action === 'save') {
          const body = {
            name: li.querySelector('.edit-name').value,
            value: parseInt(li.querySelector('.edit-value').value, 10)
          };
          act(call('POST', `${base}/save`, body));
        } else {
          act(call('POST', `${base}/${action}`));
        }
      });

      document.getElementById(`${kind}-sort`).addEventListener('change', (event) => {
        act(call('POST', '/api/settings/sort', { catalog: event.target.dataset.catalog, order: event.target.value }));
      });
    }

    document.getElementById('transaction-list').addEventListener('click', (event) => {
      const id = event.target.dataset.undo;
      if (id) {
        act(call('POST', `/api/transactions/${id}/undo`));
      }
    });

    document.getElementById('dark-mode').addEventListener('change', () => {
      act(call('POST', '/api/settings/theme'));
    });

    document.getElementById('upload').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file) {
        return;
      }
      await act(call('POST', '/api/import', await file.text(), true).then(() => setStatus('Data loaded', 'ok')));
      event.target.value = '';
    });

    const refresh = () => fetch('/api/state').then((res) => res.json()).then(render);
    act(refresh());
    setInterval(() => act(refresh()), 60000);
  </script>
</body>
</html>
"#;
