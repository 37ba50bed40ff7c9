use crate::calculator::{
    CalculatorForm, HistoryEntry, PRESET_PERCENTAGES, SUBMITTED_MESSAGE, TOAST_DURATION, TipMode,
    format_amount,
};

pub fn render_index(form: &CalculatorForm, history: &[HistoryEntry]) -> String {
    let summary = form.summary();
    let (percentage_active, amount_active) = match form.mode() {
        TipMode::PercentageDriven => (" active", ""),
        TipMode::AmountDriven => ("", " active"),
    };

    // History goes last so user text is never scanned for placeholders.
    INDEX_HTML
        .replace("{{MODE}}", mode_name(form.mode()))
        .replace("{{PERCENT_ACTIVE}}", percentage_active)
        .replace("{{AMOUNT_ACTIVE}}", amount_active)
        .replace("{{PRESETS}}", &render_presets(form.selected_preset()))
        .replace("{{PRESET_LIST}}", &preset_list())
        .replace("{{BILL}}", &format_amount(summary.bill))
        .replace("{{TIP}}", &format_amount(summary.tip))
        .replace("{{TOTAL}}", &format_amount(summary.total))
        .replace("{{TOAST_MESSAGE}}", SUBMITTED_MESSAGE)
        .replace("{{TOAST_MS}}", &TOAST_DURATION.as_millis().to_string())
        .replace("{{HISTORY}}", &render_history(history))
}

fn mode_name(mode: TipMode) -> &'static str {
    match mode {
        TipMode::PercentageDriven => "percentage",
        TipMode::AmountDriven => "amount",
    }
}

fn render_presets(selected: Option<u32>) -> String {
    PRESET_PERCENTAGES
        .iter()
        .map(|&percentage| {
            let active = if selected == Some(percentage) { " active" } else { "" };
            format!(
                r#"<button class="preset{active}" type="button" data-preset="{percentage}">{percentage}%</button>"#
            )
        })
        .collect()
}

fn preset_list() -> String {
    PRESET_PERCENTAGES
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_history(history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return r#"<p class="empty" id="history-empty">No calculations yet.</p>"#.to_string();
    }
    history.iter().map(render_history_item).collect()
}

pub fn render_history_item(entry: &HistoryEntry) -> String {
    format!(
        r#"<article class="history-item" data-id="{id}">
  <div>
    <h4>{name}</h4>
    <p class="meta">{date} &bull; {percentage}% tip</p>
    <p class="mobile">{mobile}</p>
  </div>
  <div class="amounts">
    <p class="total">&#8377;{total}</p>
    <p class="meta">&#8377;{bill} + &#8377;{tip}</p>
  </div>
</article>"#,
        id = escape_html(&entry.id),
        name = escape_html(&entry.customer_name),
        date = escape_html(&entry.date),
        percentage = entry.tip_percentage,
        mobile = escape_html(&entry.mobile_number),
        total = format_amount(entry.total_amount),
        bill = format_amount(entry.bill_amount),
        tip = format_amount(entry.tip_amount),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>TipMate</title>
  <style>
    :root {
      --bg: #0b0b10;
      --card: rgba(31, 31, 40, 0.72);
      --line: rgba(148, 148, 170, 0.22);
      --ink: #f4f4f8;
      --muted: #9a9aae;
      --accent: linear-gradient(90deg, #7c3aed, #2563eb);
      --ok: #10b981;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, #1f1f2e, var(--bg) 70%);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
    }

    header {
      position: sticky;
      top: 0;
      padding: 14px 24px;
      background: rgba(0, 0, 0, 0.5);
      backdrop-filter: blur(12px);
      border-bottom: 1px solid var(--line);
      display: flex;
      align-items: center;
      gap: 10px;
    }

    header .logo {
      width: 36px;
      height: 36px;
      border-radius: 10px;
      background: var(--accent);
      display: grid;
      place-items: center;
      font-weight: 700;
    }

    h1 {
      margin: 0;
      font-size: 1.5rem;
    }

    main {
      width: min(1100px, 100%);
      margin: 0 auto;
      padding: 32px 18px;
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 28px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 18px;
      padding: 28px;
      display: grid;
      gap: 18px;
      align-content: start;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    input {
      padding: 14px 16px;
      border-radius: 12px;
      border: 1px solid var(--line);
      background: rgba(17, 17, 24, 0.8);
      color: var(--ink);
      font-size: 1rem;
    }

    button {
      appearance: none;
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 12px;
      background: rgba(55, 55, 70, 0.5);
      color: var(--ink);
      font-weight: 600;
      cursor: pointer;
    }

    button.active,
    .submit {
      background: var(--accent);
      border-color: transparent;
    }

    .toggle {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .toggle div {
      display: flex;
      gap: 4px;
    }

    .presets {
      display: grid;
      grid-template-columns: repeat(5, 1fr);
      gap: 10px;
    }

    .hidden {
      display: none;
    }

    .summary {
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 18px;
      display: grid;
      gap: 8px;
    }

    .summary div {
      display: flex;
      justify-content: space-between;
    }

    .summary .grand {
      border-top: 1px solid var(--line);
      padding-top: 10px;
      font-size: 1.3rem;
      font-weight: 700;
    }

    .history {
      display: grid;
      gap: 12px;
      max-height: 480px;
      overflow-y: auto;
    }

    .history-item {
      display: flex;
      justify-content: space-between;
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 14px;
    }

    .history-item h4,
    .history-item p {
      margin: 0 0 4px;
    }

    .meta,
    .mobile,
    .empty {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .amounts {
      text-align: right;
    }

    .total {
      font-size: 1.2rem;
      font-weight: 700;
    }

    .toast {
      position: fixed;
      top: 90px;
      left: 50%;
      transform: translateX(-50%);
      background: var(--ok);
      border-radius: 12px;
      padding: 14px 18px;
      display: flex;
      gap: 14px;
      align-items: center;
    }

    .toast button {
      background: transparent;
      border: none;
      padding: 0;
    }
  </style>
</head>
<body>
  <header>
    <span class="logo">&#8377;</span>
    <h1>TipMate</h1>
  </header>

  <main>
    <section class="card" id="calculator" data-mode="{{MODE}}" data-presets="{{PRESET_LIST}}">
      <h2>Calculate Your Tip</h2>
      <label>Customer Name
        <input id="customer-name" type="text" placeholder="Enter your name" required />
      </label>
      <label>Mobile Number
        <input id="mobile-number" type="tel" placeholder="Enter your mobile number" required />
      </label>
      <label>Bill Amount
        <input id="bill-amount" type="number" min="0" step="0.01" placeholder="0.00" required />
      </label>

      <div class="toggle">
        <span>Tip Options</span>
        <div>
          <button class="mode{{PERCENT_ACTIVE}}" type="button" data-mode="percentage">Percentage</button>
          <button class="mode{{AMOUNT_ACTIVE}}" type="button" data-mode="amount">Amount</button>
        </div>
      </div>

      <div id="percentage-panel">
        <div class="presets">{{PRESETS}}</div>
        <label>Custom percentage
          <input id="tip-percentage" type="number" min="0" max="100" placeholder="Custom percentage" />
        </label>
      </div>
      <div id="amount-panel" class="hidden">
        <label>Tip amount
          <input id="tip-amount" type="number" min="0" step="0.01" placeholder="0.00" />
        </label>
      </div>

      <div class="summary">
        <div><span>Bill Amount:</span><span>&#8377;<span id="summary-bill">{{BILL}}</span></span></div>
        <div><span>Tip Amount:</span><span>&#8377;<span id="summary-tip">{{TIP}}</span></span></div>
        <div class="grand"><span>Total:</span><span>&#8377;<span id="summary-total">{{TOTAL}}</span></span></div>
      </div>

      <button class="submit" id="submit" type="button">Calculate &amp; Submit</button>
    </section>

    <section class="card">
      <h3>Recent Calculations</h3>
      <div class="history" id="history">{{HISTORY}}</div>
    </section>
  </main>

  <div class="toast hidden" id="toast" role="status">
    <span>{{TOAST_MESSAGE}}</span>
    <button id="toast-close" type="button" aria-label="Dismiss">&times;</button>
  </div>

  <script>
    const $ = (id) => document.getElementById(id);
    const nameEl = $('customer-name');
    const mobileEl = $('mobile-number');
    const billEl = $('bill-amount');
    const percentEl = $('tip-percentage');
    const tipEl = $('tip-amount');
    const historyEl = $('history');
    const toastEl = $('toast');
    const presetButtons = Array.from(document.querySelectorAll('.preset'));
    const modeButtons = Array.from(document.querySelectorAll('.mode'));

    let mode = $('calculator').dataset.mode;
    let toastTimer = null;

    const toNumber = (text) => {
      const value = Number(text);
      return Number.isFinite(value) ? value : 0;
    };
    const roundCents = (value) => Math.round(value * 100) / 100;
    const money = (value) => (value === 0 ? 0 : value).toFixed(2);
    const escapeHtml = (text) =>
      String(text).replace(/[&<>"']/g, (ch) => ({
        '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
      })[ch]);
    const formatDate = (iso) =>
      new Date(iso).toLocaleDateString('en-US', { month: 'long', day: 'numeric', year: 'numeric' });

    const renderSummary = () => {
      const bill = toNumber(billEl.value);
      const tip = toNumber(tipEl.value);
      $('summary-bill').textContent = money(bill);
      $('summary-tip').textContent = money(tip);
      $('summary-total').textContent = money(bill + tip);
    };

    const recompute = () => {
      if (mode === 'percentage') {
        const bill = toNumber(billEl.value);
        const percentage = toNumber(percentEl.value);
        tipEl.value = money(roundCents((bill * percentage) / 100));
      }
      renderSummary();
    };

    const selectPreset = (value) => {
      presetButtons.forEach((button) => {
        button.classList.toggle('active', button.dataset.preset === String(value));
      });
    };

    const setMode = (next) => {
      mode = next;
      modeButtons.forEach((button) => button.classList.toggle('active', button.dataset.mode === next));
      $('percentage-panel').classList.toggle('hidden', next !== 'percentage');
      $('amount-panel').classList.toggle('hidden', next !== 'amount');
      recompute();
    };

    const hideToast = () => {
      clearTimeout(toastTimer);
      toastEl.classList.add('hidden');
    };

    const showToast = () => {
      toastEl.classList.remove('hidden');
      clearTimeout(toastTimer);
      toastTimer = setTimeout(hideToast, {{TOAST_MS}});
    };

    const historyItem = (record) => `<article class="history-item" data-id="${escapeHtml(record._id)}">
  <div>
    <h4>${escapeHtml(record.customerName)}</h4>
    <p class="meta">${escapeHtml(formatDate(record.date))} &bull; ${record.tipPercentage}% tip</p>
    <p class="mobile">${escapeHtml(record.mobileNumber)}</p>
  </div>
  <div class="amounts">
    <p class="total">&#8377;${money(record.totalAmount)}</p>
    <p class="meta">&#8377;${money(record.billAmount)} + &#8377;${money(record.tipAmount)}</p>
  </div>
</article>`;

    const resetForm = () => {
      [nameEl, mobileEl, billEl, percentEl, tipEl].forEach((input) => {
        input.value = '';
      });
      selectPreset(null);
      recompute();
    };

    const submit = async () => {
      const bill = toNumber(billEl.value);
      const tip = toNumber(tipEl.value);
      if (!nameEl.value || !mobileEl.value || bill <= 0) {
        alert('Please fill in all required fields');
        return;
      }

      try {
        const res = await fetch('/api/tip-calculations', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({
            customerName: nameEl.value,
            mobileNumber: mobileEl.value,
            billAmount: roundCents(bill),
            tipAmount: roundCents(tip),
            totalAmount: roundCents(bill + tip),
            tipPercentage: Math.round((tip / bill) * 100)
          })
        });
        if (!res.ok) {
          throw new Error('Failed to submit tip calculation');
        }

        const record = await res.json();
        const empty = $('history-empty');
        if (empty) {
          empty.remove();
        }
        historyEl.insertAdjacentHTML('afterbegin', historyItem(record));
        showToast();
        resetForm();
      } catch (err) {
        console.error('Error submitting tip calculation:', err);
        alert('Failed to submit tip calculation');
      }
    };

    presetButtons.forEach((button) => {
      button.addEventListener('click', () => {
        percentEl.value = button.dataset.preset;
        selectPreset(button.dataset.preset);
        setMode('percentage');
      });
    });
    modeButtons.forEach((button) => {
      button.addEventListener('click', () => setMode(button.dataset.mode));
    });
    billEl.addEventListener('input', recompute);
    percentEl.addEventListener('input', () => {
      selectPreset(null);
      recompute();
    });
    tipEl.addEventListener('input', renderSummary);
    $('submit').addEventListener('click', submit);
    $('toast-close').addEventListener('click', hideToast);

    setMode(mode);
  </script>
</body>
</html>
"##;
